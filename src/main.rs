// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap and set up logging
// 2. Resolve the configuration (defaults < config file < flags)
// 3. Load the domain list and the backlink catalog, check the output dir
// 4. Audit every domain and print the summary
// 5. Exit with proper code (0 = all good, 1 = failed backlinks or missing
//    reports, 2 = error)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod audit;    // src/audit.rs - the per-domain loop
mod checker;  // src/checker/ - substitution, probing, pooling, aggregation
mod cli;      // src/cli.rs - command-line parsing
mod config;   // src/config.rs - the immutable run configuration
mod error;    // src/error.rs - typed errors
mod input;    // src/input/ - domain list and backlink catalog loaders
mod report;   // src/report/ - HTML reports

use anyhow::{Context, Result};
use audit::{Auditor, RunSummary};
use checker::{LogProgress, ProgressObserver};
use clap::Parser;
use cli::Cli;
use config::{AuditConfig, FileConfig};
use std::fs::OpenOptions;
use std::path::Path;
use tracing::error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let guard = match init_logging(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    };

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            2
        }
    };

    // process::exit skips destructors; flush the log file first
    drop(guard);
    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every backlink working, every report written
//   Ok(1) = some backlink failed or some report is missing
//   Err   = the run could not start (bad input, bad config, unusable output dir)
async fn run(cli: Cli) -> Result<i32> {
    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let config = AuditConfig::resolve(file_config, cli.overrides())?;

    let domains = input::load_domains(&cli.sites)?;
    let templates = input::load_backlinks(&cli.backlinks, &config.placeholder)?;
    report::prepare_output_dir(&config.output_dir)?;

    let observer: Box<dyn ProgressObserver> = if cli.json {
        // keep stdout clean for the JSON document
        Box::new(LogProgress)
    } else {
        println!(
            "🔍 Auditing {} domain(s) against {} backlink(s)",
            domains.len(),
            templates.len()
        );
        println!("📁 Reports go to {}", config.output_dir.display());
        Box::new(ConsoleProgress)
    };

    let auditor = Auditor::new(config)
        .context("failed to create HTTP client")?
        .with_observer(observer);
    let summary = auditor.run(&domains, &templates).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(if summary.is_clean() { 0 } else { 1 })
}

// Sets up tracing: stderr always, plus the --log-file if one was given.
// The returned guard must live until the end of main so the file is flushed.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}

// Prints progress lines while a domain is being checked
struct ConsoleProgress;

impl ProgressObserver for ConsoleProgress {
    fn on_domain_start(&self, position: usize, count: usize, domain: &str) {
        println!("\n🌐 Domain {}/{}: {}", position, count, domain);
    }

    fn on_progress(&self, _domain: &str, completed: usize, total: usize) {
        if completed % 5 == 0 || completed == total {
            println!("   {:>3}% ({}/{})", completed * 100 / total, completed, total);
        }
    }
}

// Prints the run summary as a table
fn print_summary(summary: &RunSummary) {
    println!();
    println!("{:<40} {:>8} {:>8}  {:<40}", "DOMAIN", "WORKING", "FAILED", "REPORT");
    println!("{}", "=".repeat(100));

    for domain in &summary.domains {
        let report = match (&domain.report, &domain.report_error) {
            (Some(path), _) => path.display().to_string(),
            (None, Some(e)) => format!("❌ {}", e),
            (None, None) => String::new(),
        };
        println!(
            "{:<40} {:>8} {:>8}  {:<40}",
            domain.domain, domain.working, domain.failed, report
        );
    }

    println!();
    println!("📊 Summary:");
    println!("   ✅ Working: {}", summary.total_working);
    println!("   ❌ Failed: {}", summary.total_failed);
    if summary.reports_failed > 0 {
        println!("   ⚠️  Reports not written: {}", summary.reports_failed);
    }
}
