// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! mdtest command-line internals.
//!
//! The pipeline stages live here rather than in `main.rs` so the integration
//! tests can drive materialization, execution, and reporting directly,
//! keeping the test path identical to the production path.

pub mod executor;
pub mod materialize;
pub mod report;
pub mod runner;
