// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Line-driven fence parser.
//!
//! Turns raw document text into an ordered sequence of [`Snippet`]s with a
//! two-state machine over `(line, 1-based number)` pairs. Driving the parse
//! line by line (rather than one regex over the whole document) is what lets
//! each snippet capture its `start_line` at the moment the fence opens, so a
//! failure deep inside a long document can be pinpointed later.
//!
//! There is no fence nesting: while inside a block, any line that is not the
//! bare closing fence is code, including lines that look like fence openers.

use miette::{Diagnostic, NamedSource, SourceSpan};

use crate::snippet::{Language, ParsedDocument, Snippet};

/// A document whose last fence is never closed.
///
/// This is fatal for the whole document: silently dropping a trailing
/// unterminated block would hide a real documentation defect, so no partial
/// results are produced.
#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("unterminated code fence: the block opened on line {open_line} is never closed")]
#[diagnostic(code(mdtest::parse::unterminated_fence))]
pub struct ParseError {
    /// 1-based line number of the offending fence opener.
    pub open_line: usize,
    /// Document text, for rendered context.
    #[source_code]
    pub src: NamedSource<String>,
    /// The fence opener that has no matching close.
    #[label("this fence is never closed")]
    pub span: SourceSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Outside any fence; non-opener lines are prose.
    Idle,
    /// Inside an unterminated fence; non-close lines are code.
    InSnippet,
}

/// Parse a document into its fenced snippets, in document order.
///
/// `file` is the path/identifier reported in locations; the parser itself
/// never touches the filesystem.
///
/// # Errors
///
/// Returns [`ParseError`] if the last snippet is still open when the input
/// ends. Per-snippet recovery is not meaningful here: the input itself is
/// malformed.
pub fn parse_document(source: &str, file: &str) -> Result<ParsedDocument, ParseError> {
    let mut snippets: Vec<Snippet> = Vec::new();
    let mut state = State::Idle;
    // Opening fence of the current block: (line number, byte offset, length).
    let mut open_fence = (0usize, 0usize, 0usize);
    let mut offset = 0usize;

    for (idx, line) in source.lines().enumerate() {
        let number = idx + 1;
        match state {
            State::Idle => {
                if let Some(language) = fence_open_language(line) {
                    snippets.push(Snippet::open(language, file, number + 1));
                    open_fence = (number, offset, line.len());
                    state = State::InSnippet;
                }
                // Anything else is prose.
            }
            State::InSnippet => {
                if is_fence_close(line) {
                    if let Some(current) = snippets.last_mut() {
                        current.complete = true;
                    }
                    state = State::Idle;
                } else if let Some(current) = snippets.last_mut() {
                    current.push_line(line);
                }
            }
        }
        offset += line.len() + 1;
    }

    if state == State::InSnippet {
        let (open_line, span_offset, span_len) = open_fence;
        return Err(ParseError {
            open_line,
            src: NamedSource::new(file, source.to_string()),
            span: (span_offset, span_len).into(),
        });
    }

    Ok(ParsedDocument {
        file: file.to_string(),
        snippets,
    })
}

/// Recognize a fence opener and resolve its language tag.
///
/// The trimmed line must be three backticks, optionally separated from a
/// recognized tag by punctuation, with nothing else trailing: ` ```cc `,
/// ` ``` cpp `, ` ```C `. A bare ` ``` ` or an unknown tag is not an opener.
fn fence_open_language(line: &str) -> Option<Language> {
    let rest = line.trim().strip_prefix("```")?;
    let rest = rest.trim_start_matches(|c: char| !c.is_ascii_alphanumeric());
    let tag_len = rest.chars().take_while(char::is_ascii_alphabetic).count();
    if tag_len == 0 {
        return None;
    }
    let (tag, trailing) = rest.split_at(tag_len);
    if !trailing.trim().is_empty() {
        return None;
    }
    Language::from_fence_tag(tag)
}

/// A closing fence is exactly three backticks once trimmed.
fn is_fence_close(line: &str) -> bool {
    line.trim() == "```"
}
