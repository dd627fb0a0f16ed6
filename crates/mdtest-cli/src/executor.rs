// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Compile-and-run execution of one snippet.
//!
//! The compiler and the program it produces are untrusted external
//! collaborators: each step is spawned as a child process with stdout and
//! stderr captured separately, and optionally killed after a bounded wait so
//! a hung example cannot hang the whole run. Every failure mode — cannot
//! materialize, cannot spawn, non-zero exit, signal, timeout — is folded
//! into a [`TestOutcome`]; nothing here aborts the run.

use std::fmt::Write as _;
use std::io::{Read, Write as _};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use mdtest_core::outcome::{Status, TestOutcome};
use mdtest_core::snippet::Snippet;
use tracing::debug;

use crate::materialize::materialize;

/// How often a timed wait polls the child for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Compiler invocation settings, applied uniformly to every snippet in a
/// run and never mutated during one.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Compiler executable name or path.
    pub compiler: String,
    /// Flags passed before the source file, already split on whitespace.
    pub flags: Vec<String>,
    /// Bounded wait for each compile and run step; `None` waits forever.
    pub timeout: Option<Duration>,
}

impl RunConfig {
    /// Build a config from the CLI's opaque compiler/flags strings.
    pub fn new(compiler: impl Into<String>, flags: &str) -> Self {
        Self {
            compiler: compiler.into(),
            flags: flags.split_whitespace().map(str::to_string).collect(),
            timeout: None,
        }
    }

    /// Bound each compile and run step to `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// What became of one child process.
enum ProcessResult {
    Completed {
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },
    TimedOut,
}

/// Test one snippet: materialize, compile, run, classify.
///
/// Emits one progress glyph as the outcome is determined: `.` pass, `x`
/// fail, `s` skip.
pub fn run_snippet(config: &RunConfig, snippet: Snippet) -> TestOutcome {
    let outcome = classify(config, snippet);

    let glyph = match outcome.status {
        Status::Pass => '.',
        Status::Fail => 'x',
        Status::Skip => 's',
    };
    print!("{glyph}");
    let _ = std::io::stdout().flush();

    outcome
}

fn classify(config: &RunConfig, snippet: Snippet) -> TestOutcome {
    if snippet.skip {
        return TestOutcome::skip(snippet);
    }

    let materialized = match materialize(&snippet) {
        Ok(materialized) => materialized,
        Err(report) => {
            return TestOutcome::fail(
                snippet,
                format!("failed to materialize snippet: {report:?}"),
            );
        }
    };

    // Step 1 — compile: <compiler> <flags...> <source> -o <binary>
    debug!(
        source = %materialized.source_path(),
        language = %snippet.language,
        compiler = %config.compiler,
        "compiling snippet"
    );
    let mut compile = Command::new(&config.compiler);
    compile
        .args(&config.flags)
        .arg(materialized.source_path().as_str())
        .arg("-o")
        .arg(materialized.binary_path().as_str());

    match wait_bounded(compile, config.timeout) {
        Err(spawn_error) => {
            return TestOutcome::fail(
                snippet,
                format!(
                    "failed to invoke compiler '{}': {spawn_error}",
                    config.compiler
                ),
            );
        }
        Ok(ProcessResult::TimedOut) => {
            return TestOutcome::fail(snippet, timeout_diagnostic("compilation", config));
        }
        Ok(ProcessResult::Completed {
            status,
            stdout,
            stderr,
        }) => {
            if !status.success() {
                return TestOutcome::fail(snippet, process_diagnostic(status, &stdout, &stderr));
            }
        }
    }

    // Step 2 — run the produced binary with no arguments.
    debug!(binary = %materialized.binary_path(), "running snippet binary");
    let run = Command::new(materialized.binary_path().as_str());

    match wait_bounded(run, config.timeout) {
        Err(spawn_error) => {
            TestOutcome::fail(snippet, format!("failed to run snippet binary: {spawn_error}"))
        }
        Ok(ProcessResult::TimedOut) => {
            TestOutcome::fail(snippet, timeout_diagnostic("execution", config))
        }
        Ok(ProcessResult::Completed {
            status,
            stdout,
            stderr,
        }) => {
            if status.success() {
                TestOutcome::pass(snippet)
            } else {
                TestOutcome::fail(snippet, process_diagnostic(status, &stdout, &stderr))
            }
        }
    }
}

fn timeout_diagnostic(step: &str, config: &RunConfig) -> String {
    let secs = config.timeout.unwrap_or_default().as_secs();
    format!("{step} timed out after {secs}s")
}

/// Fold exit status and both output streams into one diagnostic, stderr
/// first — compiler errors and crash traces land there.
fn process_diagnostic(status: ExitStatus, stdout: &str, stderr: &str) -> String {
    let mut diagnostic = String::new();
    let _ = writeln!(diagnostic, "process exited with {status}");
    if !stderr.trim().is_empty() {
        diagnostic.push_str(stderr.trim_end());
        diagnostic.push('\n');
    }
    if !stdout.trim().is_empty() {
        diagnostic.push_str(stdout.trim_end());
        diagnostic.push('\n');
    }
    diagnostic
}

/// Spawn a child and wait for it, optionally bounded.
///
/// Both output pipes are drained on dedicated threads so a chatty child can
/// never fill a pipe buffer and deadlock against the wait loop. On timeout
/// the child is killed and reaped before returning.
fn wait_bounded(mut command: Command, timeout: Option<Duration>) -> std::io::Result<ProcessResult> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn()?;
    let stdout_reader = spawn_reader(child.stdout.take());
    let stderr_reader = spawn_reader(child.stderr.take());

    let status = match timeout {
        None => child.wait()?,
        Some(limit) => {
            let deadline = Instant::now() + limit;
            loop {
                if let Some(status) = child.try_wait()? {
                    break status;
                }
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = stdout_reader.join();
                    let _ = stderr_reader.join();
                    return Ok(ProcessResult::TimedOut);
                }
                thread::sleep(POLL_INTERVAL);
            }
        }
    };

    let stdout = stdout_reader.join().unwrap_or_default();
    let stderr = stderr_reader.join().unwrap_or_default();

    Ok(ProcessResult::Completed {
        status,
        stdout,
        stderr,
    })
}

/// Drain one output pipe to a string on its own thread.
fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut text = String::new();
        if let Some(mut pipe) = pipe {
            let mut bytes = Vec::new();
            if pipe.read_to_end(&mut bytes).is_ok() {
                text = String::from_utf8_lossy(&bytes).into_owned();
            }
        }
        text
    })
}
