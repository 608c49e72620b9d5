//! `rdft-conformance`: runs an RDF parser test manifest and writes an EARL report.
//!
//! **Usage:**
//! ```
//! rdft-conformance [MANIFEST] [--config <file>] [--workers <n>] [--oracle <tool>] ...
//! ```
//!
//! Prints one status line per case as it completes, a diff of every failed
//! comparison, and a `score / total (N skipped)` summary. Exits non-zero if
//! any scored case fails or the run cannot start.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use rdft_conformance::{ConformanceReport, Harness, HarnessConfig, TestResult};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Run an RDF parser conformance manifest.
#[derive(Parser)]
#[command(
    name = "rdft-conformance",
    about = "Run an RDF test manifest against the parser and write an EARL report"
)]
struct Args {
    /// Manifest URL or local path (overrides the config file).
    manifest: Option<String>,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fixture cache directory.
    #[arg(long)]
    suite_dir: Option<PathBuf>,

    /// Directory for captured per-case output.
    #[arg(long)]
    results_dir: Option<PathBuf>,

    /// EARL report path.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Maximum number of cases run at once.
    #[arg(long, short = 'j')]
    workers: Option<usize>,

    /// Run negative cases for display only, excluded from the score.
    #[arg(long)]
    skip_negative: bool,

    /// Pattern on the test type IRI that marks a case negative.
    #[arg(long)]
    negative_pattern: Option<String>,

    /// Syntax used when a case names none (turtle, ntriples, trig, nquads).
    #[arg(long)]
    syntax: Option<String>,

    /// External graph comparison tool, run as `<tool> -d <expected> --compare <actual>`.
    #[arg(long)]
    oracle: Option<PathBuf>,

    /// Only run cases whose id or name matches this pattern.
    #[arg(long)]
    filter: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn into_config(self) -> Result<HarnessConfig> {
        let mut config = HarnessConfig::load(self.config.as_deref())?;
        if let Some(manifest) = self.manifest {
            config.manifest = Some(manifest);
        }
        if let Some(dir) = self.suite_dir {
            config.suite_dir = dir;
        }
        if let Some(dir) = self.results_dir {
            config.results_dir = dir;
        }
        if let Some(report) = self.report {
            config.report = report;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if self.skip_negative {
            config.skip_negative = true;
        }
        if let Some(pattern) = self.negative_pattern {
            config.negative_pattern = pattern;
        }
        if let Some(syntax) = self.syntax {
            config.syntax = syntax;
        }
        if self.oracle.is_some() {
            config.oracle = self.oracle;
        }
        if self.filter.is_some() {
            config.filter = self.filter;
        }
        Ok(config)
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn status(result: &TestResult) -> &'static str {
    if result.case.skipped {
        "SKIP"
    } else if result.success {
        "PASS"
    } else {
        "FAIL"
    }
}

fn print_failures(report: &ConformanceReport) {
    for result in report.results.iter().filter(|r| r.is_failure()) {
        println!();
        println!("--- {} ({})", result.case.label(), result.case.id);
        if let Some(comment) = &result.case.comment {
            println!("    {}", comment);
        }
        if let Some(error) = &result.error {
            println!("    error: {}", error);
        } else if result.case.negative {
            println!("    expected a parse error, none was reported");
        }
        let diagnostic = result.comparison.as_ref().and_then(|c| c.diagnostic.as_ref());
        if let Some(diagnostic) = diagnostic {
            println!("    comparison: {}", diagnostic.trim_end());
        }
        if let Some(expected) = &result.expected {
            for line in expected.lines() {
                println!("-{}", line);
            }
            for line in result.actual.as_deref().unwrap_or_default().lines() {
                println!("+{}", line);
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let harness = Harness::new(args.into_config()?)?;
    let config = harness.config();
    tracing::info!(
        manifest = config.manifest.as_deref().unwrap_or_default(),
        workers = config.workers,
        oracle = config.oracle.is_some(),
        "starting conformance run"
    );

    let report = harness.run(|result| {
        println!("[{}] {}", status(result), result.case.label());
    })?;
    tracing::info!(
        passed = report.score(),
        failed = report.failure_count(),
        skipped = report.skipped.len(),
        "conformance run finished"
    );

    print_failures(&report);

    println!();
    println!("{}", report.summary());
    println!("EARL report written to {}", config.report.display());

    if !report.all_passed() {
        eprintln!(
            "Conformance FAILED: {} case(s) did not pass.",
            report.failure_count()
        );
        process::exit(1);
    }
    Ok(())
}
