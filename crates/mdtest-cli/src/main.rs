// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! mdtest command-line interface.
//!
//! Parses one documentation file, compiles and runs every fenced snippet,
//! and exits with the number of failing snippets.

use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::{Context, IntoDiagnostic, Result};

use mdtest_cli::executor::RunConfig;
use mdtest_cli::{report, runner};
use mdtest_core::location::DiagnosticStyle;
use mdtest_core::parser::parse_document;

/// Compile and run fenced code blocks embedded in documentation
#[derive(Debug, Parser)]
#[command(name = "mdtest")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Documentation file to test
    file: Utf8PathBuf,

    /// Compiler executable invoked for every snippet
    #[arg(long, default_value = "cc")]
    compiler: String,

    /// Compiler flags, space-separated, passed through before the source file
    #[arg(long, default_value = "")]
    flags: String,

    /// Kill a compile or run step that exceeds this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Stop executing snippets after the first failure
    #[arg(long)]
    fail_fast: bool,
}

fn main() -> Result<()> {
    init_tracing();

    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    // Exit code is the failing-snippet count: zero means a clean run.
    match run(&cli) {
        Ok(failing) => std::process::exit(i32::try_from(failing).unwrap_or(i32::MAX)),
        Err(e) => {
            eprintln!("{e:?}");
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<usize> {
    let contents = std::fs::read_to_string(&cli.file)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read '{}'", cli.file))?;

    let document = parse_document(&contents, cli.file.as_str())?;

    let mut config = RunConfig::new(cli.compiler.clone(), &cli.flags);
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let outcomes = runner::run_document(&config, document, cli.fail_fast);
    println!();

    Ok(report::print_results(&outcomes, DiagnosticStyle::default()))
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    // Progress glyphs own stdout; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mdtest_cli=info,mdtest_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
