// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Run reporting.
//!
//! Prints one failure block per failing outcome, in document order, with
//! the diagnostic's temp-file position remapped back to the document, then
//! a summary. The returned failing count doubles as the process exit code.

use mdtest_core::location::{DiagnosticStyle, remap_location, trim_diagnostic};
use mdtest_core::outcome::{TestOutcome, failed, passed};

/// Print failure blocks and the summary; returns the failing count.
pub fn print_results(outcomes: &[TestOutcome], style: DiagnosticStyle) -> usize {
    for outcome in outcomes.iter().filter(|o| o.is_fail()) {
        let location = remap_location(&outcome.snippet, &outcome.diagnostic, style);
        println!("Failed - {location}");
        println!("{}", trim_diagnostic(&outcome.diagnostic));
    }

    let passing = passed(outcomes);
    let failing = failed(outcomes);

    println!("Passed: {passing}");
    if failing == 0 {
        println!("\nSuccess!");
    } else {
        println!("Failed: {failing}");
    }

    failing
}
