// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Snippet materialization.
//!
//! Writes a snippet's code body to a real temporary source file so the
//! external compiler can process it, and reserves a sibling path for the
//! compiled binary. Each snippet gets its own randomly named temporary
//! directory, so concurrent or repeated materializations never collide and
//! both artifacts vanish when the [`MaterializedSnippet`] is dropped.

use camino::{Utf8Path, Utf8PathBuf};
use mdtest_core::snippet::Snippet;
use miette::{Context, IntoDiagnostic, Result};
use tempfile::TempDir;

/// A snippet written out to disk, ready to compile.
#[derive(Debug)]
pub struct MaterializedSnippet {
    /// Owns the temporary directory; dropping it removes both artifacts.
    _dir: TempDir,
    source_path: Utf8PathBuf,
    binary_path: Utf8PathBuf,
}

impl MaterializedSnippet {
    /// Path of the written source file, extension matching the snippet
    /// language.
    pub fn source_path(&self) -> &Utf8Path {
        &self.source_path
    }

    /// Reserved, not-yet-existing path for the compiled binary.
    pub fn binary_path(&self) -> &Utf8Path {
        &self.binary_path
    }
}

/// Write `snippet.code` to a fresh temporary source file.
///
/// # Errors
///
/// Fails if the temporary directory cannot be created or the source file
/// cannot be written — an environment problem, not a documentation bug, and
/// reported as such by the executor.
pub fn materialize(snippet: &Snippet) -> Result<MaterializedSnippet> {
    let dir = tempfile::Builder::new()
        .prefix("mdtest-")
        .tempdir()
        .into_diagnostic()
        .wrap_err("Failed to create temporary snippet directory")?;

    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .map_err(|_| miette::miette!("Non-UTF-8 temporary directory path"))?;

    let source_path = root.join(format!("snippet.{}", snippet.language.extension()));
    let binary_path = root.join("snippet.bin");

    std::fs::write(&source_path, &snippet.code)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to write snippet source '{source_path}'"))?;

    Ok(MaterializedSnippet {
        _dir: dir,
        source_path,
        binary_path,
    })
}
