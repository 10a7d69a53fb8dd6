// src/error.rs
// =============================================================================
// Typed errors for the audit.
//
// There are three families of failure, and each one is handled at a
// different level:
// - LoadError: bad input lists or bad configuration. Fatal, the run stops
//   before any domain is processed.
// - SetupError: the output directory can't be created or written. Fatal.
// - ReportWriteError: one domain's report could not be persisted. Only that
//   domain is affected, the run continues with the next one.
//
// Transport failures (DNS, refused connection, timeout, TLS) are NOT here:
// they never leave the probe, they end up as ProbeOutcome::Error.
//
// Rust concepts:
// - thiserror: derives Display and std::error::Error from attributes
// - #[source]: keeps the underlying io/json error for error chains
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain the domain list, the backlink catalog or a usable config
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backlink catalog is not a JSON array of `{ "url": "..." }` records
    #[error("malformed backlink catalog {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no {what} to process")]
    Empty { what: &'static str },

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// The output directory is unusable before the run even starts
#[derive(Debug, Error)]
#[error("output directory {} is not writable: {source}", path.display())]
pub struct SetupError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Persisting one domain's report failed
#[derive(Debug, Error)]
pub enum ReportWriteError {
    #[error("failed to render report for {domain}: {source}")]
    Render {
        domain: String,
        #[source]
        source: askama::Error,
    },

    #[error("failed to write report {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
