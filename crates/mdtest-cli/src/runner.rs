// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Document-level run orchestration.
//!
//! Drives the executor over a parsed document, one snippet at a time, in
//! document order. Execution is synchronous and sequential: external
//! compilation dominates the cost, and ordering of outcomes is part of the
//! reporter's contract.

use mdtest_core::outcome::TestOutcome;
use mdtest_core::snippet::ParsedDocument;
use tracing::{info, instrument};

use crate::executor::{RunConfig, run_snippet};

/// Test every snippet of a document, yielding outcomes in document order.
///
/// With `fail_fast`, snippets after the first failure are not executed;
/// they are marked to skip and flow through the executor's short-circuit so
/// they still emit a progress glyph and an ordered outcome.
#[instrument(skip_all, fields(file = %document.file))]
pub fn run_document(
    config: &RunConfig,
    document: ParsedDocument,
    fail_fast: bool,
) -> Vec<TestOutcome> {
    info!(snippets = document.snippets.len(), "starting snippet test run");

    let mut outcomes = Vec::with_capacity(document.snippets.len());
    let mut aborted = false;

    for mut snippet in document.snippets {
        if aborted {
            snippet.skip = true;
        }
        let outcome = run_snippet(config, snippet);
        if fail_fast && outcome.is_fail() {
            info!("first failure hit, skipping remaining snippets");
            aborted = true;
        }
        outcomes.push(outcome);
    }

    outcomes
}
