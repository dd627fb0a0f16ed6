// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests for the `mdtest` binary.
//!
//! Each test writes a documentation fixture and a stand-in compiler script
//! into a temporary directory, runs the real binary on them, and asserts on
//! stdout plus the exit code. The stand-in accepts the production invocation
//! shape `<compiler> [flags...] <source> -o <binary>`, so the binary is
//! exercised exactly as it would be against gcc or clang.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Stand-in compiler. A source containing `COMPILE_ERROR` fails with a
/// gcc-shaped diagnostic pointing at line 2, column 5 of the temp file;
/// otherwise the produced "binary" is a shell script assembled from the
/// snippet's `exit`/`echo`/`sleep` lines.
const FAKE_COMPILER: &str = r#"#!/bin/sh
src=""
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then
    shift
    out="$1"
  else
    src="$1"
  fi
  shift
done
if grep -q COMPILE_ERROR "$src"; then
  echo "$src:2:5: error: unknown identifier" >&2
  exit 1
fi
printf '#!/bin/sh\n' > "$out"
grep -E '^(exit|echo|sleep)' "$src" >> "$out" || true
chmod +x "$out"
exit 0
"#;

fn write_fake_compiler(dir: &Path) -> String {
    let path = dir.join("fakecc");
    fs::write(&path, FAKE_COMPILER).expect("write fake compiler");
    let mut perms = fs::metadata(&path).expect("stat fake compiler").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod fake compiler");
    path.to_string_lossy().into_owned()
}

fn write_doc(dir: &Path, contents: &str) -> String {
    let path = dir.join("doc.md");
    fs::write(&path, contents).expect("write fixture document");
    path.to_string_lossy().into_owned()
}

fn mdtest(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mdtest"))
        .args(args)
        .output()
        .expect("failed to run mdtest")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn mixed_document_reports_pass_and_fail_with_exit_one() {
    let dir = TempDir::new().unwrap();
    let compiler = write_fake_compiler(dir.path());
    let doc = write_doc(
        dir.path(),
        "\
# Examples

```cc
exit 0
```

```cc
exit 1
```
",
    );

    let output = mdtest(&[&doc, "--compiler", &compiler]);
    let text = stdout(&output);

    assert_eq!(output.status.code(), Some(1), "exit code is the fail count");
    assert!(text.contains(".x"), "progress glyphs in snippet order: {text}");
    assert!(text.contains("Passed: 1"), "stdout: {text}");
    assert!(text.contains("Failed: 1"), "stdout: {text}");
    assert!(!text.contains("Success!"), "stdout: {text}");
}

#[test]
fn unterminated_fence_aborts_before_any_compilation() {
    let dir = TempDir::new().unwrap();
    // A compiler that would poison the run if ever invoked.
    let doc = write_doc(dir.path(), "```cc\nexit 0\n");

    let output = mdtest(&[&doc, "--compiler", "/nonexistent/never-invoked"]);
    let text = stdout(&output);
    let errors = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(
        errors.contains("unterminated code fence"),
        "stderr: {errors}"
    );
    assert!(!text.contains("Passed:"), "no partial results: {text}");
}

#[test]
fn document_without_snippets_is_a_clean_run() {
    let dir = TempDir::new().unwrap();
    let compiler = write_fake_compiler(dir.path());
    let doc = write_doc(dir.path(), "# Title\n\nProse only, no examples.\n");

    let output = mdtest(&[&doc, "--compiler", &compiler]);
    let text = stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(text.contains("Passed: 0"), "stdout: {text}");
    assert!(text.contains("Success!"), "stdout: {text}");
}

#[test]
fn compile_error_location_is_remapped_into_the_document() {
    let dir = TempDir::new().unwrap();
    let compiler = write_fake_compiler(dir.path());
    // The fake compiler reports temp-file line 2, which is the second code
    // line of the block: document line 4, where COMPILE_ERROR sits.
    let doc = write_doc(
        dir.path(),
        "\
# Title
```cc
int x = 1;
int y = COMPILE_ERROR;
```
",
    );

    let output = mdtest(&[&doc, "--compiler", &compiler]);
    let text = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(
        text.contains(&format!("Failed - {doc}:4:5")),
        "remapped location in: {text}"
    );
    assert!(text.contains("error: unknown identifier"), "stdout: {text}");
}

#[test]
fn failure_without_location_marker_falls_back_to_snippet_start() {
    let dir = TempDir::new().unwrap();
    let compiler = write_fake_compiler(dir.path());
    // Runtime failure: the binary exits 7 with no file:line:col reference.
    let doc = write_doc(dir.path(), "```cc\nexit 7\n```\n");

    let output = mdtest(&[&doc, "--compiler", &compiler]);
    let text = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(
        text.contains(&format!("Failed - {doc}:2")),
        "fallback location in: {text}"
    );
}

#[test]
fn exit_code_counts_every_failing_snippet() {
    let dir = TempDir::new().unwrap();
    let compiler = write_fake_compiler(dir.path());
    let doc = write_doc(
        dir.path(),
        "```cc\nexit 1\n```\n```cc\nexit 2\n```\n```cc\nexit 0\n```\n",
    );

    let output = mdtest(&[&doc, "--compiler", &compiler]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).contains("Failed: 2"));
}

#[test]
fn fail_fast_skips_the_rest_of_the_document() {
    let dir = TempDir::new().unwrap();
    let compiler = write_fake_compiler(dir.path());
    let doc = write_doc(
        dir.path(),
        "```cc\nexit 1\n```\n```cc\nexit 0\n```\n",
    );

    let output = mdtest(&[&doc, "--compiler", &compiler, "--fail-fast"]);
    let text = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(text.contains("xs"), "fail then skip glyphs: {text}");
    assert!(text.contains("Passed: 0"), "stdout: {text}");
}

#[test]
fn hung_snippet_times_out_instead_of_hanging_the_run() {
    let dir = TempDir::new().unwrap();
    let compiler = write_fake_compiler(dir.path());
    let doc = write_doc(dir.path(), "```cc\nsleep 30\n```\n```cc\nexit 0\n```\n");

    let output = mdtest(&[&doc, "--compiler", &compiler, "--timeout-secs", "1"]);
    let text = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(text.contains("execution timed out after 1s"), "stdout: {text}");
    // The snippet after the hung one is still evaluated.
    assert!(text.contains("Passed: 1"), "stdout: {text}");
}

#[test]
fn missing_document_reports_a_read_error() {
    let dir = TempDir::new().unwrap();
    let compiler = write_fake_compiler(dir.path());
    let missing = dir.path().join("absent.md");

    let output = mdtest(&[missing.to_str().unwrap(), "--compiler", &compiler]);
    let errors = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(errors.contains("Failed to read"), "stderr: {errors}");
}
