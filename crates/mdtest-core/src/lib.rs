// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! mdtest core: extract fenced code blocks from documentation and model
//! their test results.
//!
//! This crate contains the side-effect-free half of mdtest:
//! - Snippet extraction (line-driven fence parser with source positions)
//! - The per-snippet test outcome model
//! - Remapping of compiler/runtime diagnostics back to document locations
//!
//! Process execution and temporary-file handling live in `mdtest-cli`.

#![doc = include_str!("../../../README.md")]

pub mod location;
pub mod outcome;
pub mod parser;
pub mod snippet;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::location::{DiagnosticStyle, SourceLocation};
    pub use crate::outcome::{Status, TestOutcome};
    pub use crate::parser::{ParseError, parse_document};
    pub use crate::snippet::{Language, ParsedDocument, Snippet};
}
