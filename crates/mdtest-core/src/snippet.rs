// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Snippet data model.
//!
//! A [`Snippet`] is one fenced code block lifted out of a documentation file,
//! together with everything needed to compile it in isolation and to point
//! back at the document when it fails: the declared language, the origin
//! file, and the 1-based line number of its first code line.

use std::fmt;

/// Language declared on a fence opener, mapped to the source-file extension
/// the external compiler needs to pick the right front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Plain C (` ```c `).
    C,
    /// C++ (` ```cc ` or ` ```cpp `).
    #[default]
    Cpp,
}

impl Language {
    /// Resolve a fence tag to a language, case-insensitively.
    ///
    /// Returns `None` for tags mdtest does not test (` ```text `, ` ```sh `,
    /// ...); blocks with unrecognized tags are treated as prose.
    pub fn from_fence_tag(tag: &str) -> Option<Self> {
        if tag.eq_ignore_ascii_case("c") {
            Some(Self::C)
        } else if tag.eq_ignore_ascii_case("cc") || tag.eq_ignore_ascii_case("cpp") {
            Some(Self::Cpp)
        } else {
            None
        }
    }

    /// File extension (without the dot) for a materialized snippet.
    pub fn extension(self) -> &'static str {
        match self {
            Self::C => "c",
            Self::Cpp => "cc",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::C => write!(f, "c"),
            Self::Cpp => write!(f, "cc"),
        }
    }
}

/// One fenced code block extracted from a documentation file.
///
/// `code` holds the block body with each source line newline-terminated, in
/// original order. Once `complete` is set by the parser the snippet is
/// immutable; no further lines are appended.
#[derive(Debug, Clone)]
pub struct Snippet {
    /// Accumulated code body, newline-terminated per line.
    pub code: String,
    /// Language declared on the opening fence.
    pub language: Language,
    /// Path/identifier of the document the snippet came from.
    pub file: String,
    /// 1-based line number of the first code line (the line after the
    /// opening fence).
    pub start_line: usize,
    /// Whether a matching closing fence was observed.
    pub complete: bool,
    /// Short-circuit both compile and run, reporting the snippet as skipped.
    /// Never set by the parser; used by the fail-fast runner.
    pub skip: bool,
}

impl Snippet {
    /// Start a new, still-open snippet at the given document position.
    pub fn open(language: Language, file: &str, start_line: usize) -> Self {
        Self {
            code: String::new(),
            language,
            file: file.to_string(),
            start_line,
            complete: false,
            skip: false,
        }
    }

    /// Append one source line (plus trailing newline) to the body.
    pub(crate) fn push_line(&mut self, line: &str) {
        debug_assert!(!self.complete, "completed snippets are immutable");
        self.code.push_str(line);
        self.code.push('\n');
    }
}

/// The full parse result for one document: its snippets, in document order.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Path/identifier of the parsed document.
    pub file: String,
    /// Snippets in the order they appear in the document.
    pub snippets: Vec<Snippet>,
}
