// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every option that maps to a config value is an Option<...>: when it is
// not given, the value comes from the --config file or the built-in default
// (see config.rs for the precedence rules).
//
// Example:
//   backlink-guardian --sites siti.txt --backlinks backlink.json \
//       --output-dir reports --concurrency 20 --timeout 10
// =============================================================================

use crate::config::ConfigOverrides;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "backlink-guardian",
    version = "0.1.0",
    about = "Checks that backlink templates still resolve for every migrated domain",
    long_about = "backlink-guardian substitutes each audited domain into a catalog of backlink URL \
                  templates, checks every resulting URL over HTTP and writes one HTML report per domain."
)]
pub struct Cli {
    /// Text file with one domain per line
    #[arg(long, default_value = "siti.txt")]
    pub sites: PathBuf,

    /// JSON array of backlink records, e.g. [{"url": "http://vostroportale.com/page"}]
    #[arg(long, default_value = "backlink.json")]
    pub backlinks: PathBuf,

    /// Optional TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory the HTML reports are written to (default: reports)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Number of backlinks checked at the same time per domain (default: 10)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds (default: 15)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Token in the templates that stands for the audited domain
    #[arg(long)]
    pub placeholder: Option<String>,

    /// Maximum redirects to follow, 0 to record 30x as-is (default: 10)
    #[arg(long)]
    pub max_redirects: Option<usize>,

    /// Print the run summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Also write the log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace); RUST_LOG wins if set
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            concurrency: self.concurrency,
            timeout_secs: self.timeout,
            placeholder: self.placeholder.clone(),
            output_dir: self.output_dir.clone(),
            max_redirects: self.max_redirects,
        }
    }
}
