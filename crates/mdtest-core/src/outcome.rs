// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Per-snippet test outcomes.
//!
//! Outcomes are produced 1:1 with snippets and keep document order; the
//! reporter relies on both. A failing snippet never carries an empty
//! diagnostic, and a passing or skipped one never carries a non-empty one.

use crate::snippet::Snippet;

/// Classification of one snippet's compile-and-run attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Compiled and exited zero.
    Pass,
    /// Failed to materialize, compile, or run cleanly.
    Fail,
    /// Short-circuited; no process was spawned.
    Skip,
}

/// The result of testing one snippet.
#[derive(Debug, Clone)]
pub struct TestOutcome {
    /// Pass, fail, or skip.
    pub status: Status,
    /// The snippet this outcome belongs to.
    pub snippet: Snippet,
    /// Captured compiler error text or runtime failure trace; empty unless
    /// `status` is [`Status::Fail`].
    pub diagnostic: String,
}

impl TestOutcome {
    /// A clean pass.
    pub fn pass(snippet: Snippet) -> Self {
        Self {
            status: Status::Pass,
            snippet,
            diagnostic: String::new(),
        }
    }

    /// A failure with its captured diagnostic text.
    pub fn fail(snippet: Snippet, diagnostic: impl Into<String>) -> Self {
        let diagnostic = diagnostic.into();
        debug_assert!(!diagnostic.is_empty(), "failures must carry a diagnostic");
        Self {
            status: Status::Fail,
            snippet,
            diagnostic,
        }
    }

    /// A skipped snippet.
    pub fn skip(snippet: Snippet) -> Self {
        Self {
            status: Status::Skip,
            snippet,
            diagnostic: String::new(),
        }
    }

    /// Whether this outcome is a failure.
    pub fn is_fail(&self) -> bool {
        self.status == Status::Fail
    }
}

/// Count of passing outcomes.
pub fn passed(outcomes: &[TestOutcome]) -> usize {
    outcomes
        .iter()
        .filter(|o| o.status == Status::Pass)
        .count()
}

/// Count of failing outcomes. Doubles as the process exit code.
pub fn failed(outcomes: &[TestOutcome]) -> usize {
    outcomes.iter().filter(|o| o.is_fail()).count()
}
