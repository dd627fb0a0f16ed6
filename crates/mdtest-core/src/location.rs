// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Remapping diagnostics back to document locations.
//!
//! Compiler and runtime diagnostics reference line numbers inside the
//! materialized temporary file, not the original document. This module
//! translates the first such reference into a document location, and trims
//! process-bootstrap frames off runtime backtraces before display.
//!
//! The line:column heuristic is inherently toolchain-specific, so it hangs
//! off [`DiagnosticStyle`]; a toolchain with a different diagnostic format
//! gets its own variant rather than a patched regex.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::snippet::Snippet;

/// A position in the original document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Document path/identifier.
    pub file: String,
    /// 1-based document line.
    pub line: usize,
    /// 1-based column, when the diagnostic carried one.
    pub column: Option<u32>,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(column) => write!(f, "{}:{}:{}", self.file, self.line, column),
            None => write!(f, "{}:{}", self.file, self.line),
        }
    }
}

/// How a toolchain formats source references in its diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticStyle {
    /// `file.cc:LINE:COL:` references, as emitted by gcc, clang, and the
    /// sanitizer runtimes.
    #[default]
    GccLike,
}

impl DiagnosticStyle {
    /// Find the first temp-file line:column reference in a diagnostic.
    pub fn locate(self, diagnostic: &str) -> Option<(usize, u32)> {
        match self {
            Self::GccLike => gcc_like_location(diagnostic),
        }
    }
}

/// Matches `<anything>.c:12:5`, `.cc`, or `.cpp` — the shape of a gcc/clang
/// reference into the materialized snippet source.
fn gcc_like_location(diagnostic: &str) -> Option<(usize, u32)> {
    static LOCATION: OnceLock<Regex> = OnceLock::new();
    let re = LOCATION
        .get_or_init(|| Regex::new(r"\.(?:cc|cpp|c):(\d+):(\d+)").expect("location regex is valid"));

    let caps = re.captures(diagnostic)?;
    let line = caps[1].parse().ok()?;
    let column = caps[2].parse().ok()?;
    Some((line, column))
}

/// Translate a diagnostic's temp-file position into a document location.
///
/// Temp-file line 1 is the snippet's first code line, which already sits at
/// `start_line`, so the document line is `start_line - 1 + internal line`.
/// When the diagnostic carries no recognizable reference (a linker error,
/// say), the location degrades to the snippet's first line rather than
/// failing to report at all.
pub fn remap_location(
    snippet: &Snippet,
    diagnostic: &str,
    style: DiagnosticStyle,
) -> SourceLocation {
    match style.locate(diagnostic) {
        Some((line, column)) => SourceLocation {
            file: snippet.file.clone(),
            line: (snippet.start_line + line).saturating_sub(1),
            column: Some(column),
        },
        None => SourceLocation {
            file: snippet.file.clone(),
            line: snippet.start_line,
            column: None,
        },
    }
}

/// Backtrace frames at or below these markers belong to process startup,
/// not to the document author's code.
const BOOTSTRAP_FRAME_MARKERS: [&str; 2] = ["__libc_start_main", "in _start"];

/// Cut a runtime backtrace off at the first process-bootstrap frame.
///
/// Truncation happens at the start of the line containing the marker; a
/// diagnostic without either marker is returned untouched.
pub fn trim_diagnostic(diagnostic: &str) -> &str {
    let cut = BOOTSTRAP_FRAME_MARKERS
        .iter()
        .filter_map(|marker| diagnostic.find(marker))
        .min();

    match cut {
        Some(pos) => {
            let line_start = diagnostic[..pos].rfind('\n').map_or(0, |i| i + 1);
            diagnostic[..line_start].trim_end()
        }
        None => diagnostic,
    }
}
