// src/config.rs
// =============================================================================
// The single, immutable configuration value of an audit run.
//
// Every component receives what it needs from AuditConfig explicitly; there
// is no global settings table. Values are resolved once at startup:
//
//   CLI flag  >  TOML config file (--config)  >  built-in default
//
// The retry policy and the User-Agent are fixed and cannot be overridden.
//
// Example config file:
//
//   concurrency = 20
//   timeout_secs = 10
//   placeholder = "vostroportale.com"
//   output_dir = "reports"
//   max_redirects = 5
// =============================================================================

use crate::error::LoadError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_PLACEHOLDER: &str = "vostroportale.com";
pub const DEFAULT_OUTPUT_DIR: &str = "reports";
pub const DEFAULT_MAX_REDIRECTS: usize = 10;
pub const USER_AGENT: &str = "Mozilla/5.0";

/// How often and how patiently a single URL is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of tries, including the first one
    pub attempts: u32,
    /// Pause between two failed tries
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Width of the per-domain probe pool
    pub concurrency: usize,
    /// Applied to every single attempt
    pub timeout: Duration,
    pub retry: RetryPolicy,
    /// Token inside each backlink template standing for the audited domain
    pub placeholder: String,
    pub output_dir: PathBuf,
    pub user_agent: String,
    /// 0 disables redirect following
    pub max_redirects: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            user_agent: USER_AGENT.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

/// Shape of the optional TOML file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub placeholder: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub max_redirects: Option<usize>,
}

/// Values given on the command line; `None` means "not given"
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub placeholder: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub max_redirects: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound { path: path.to_path_buf() });
        }
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
            .map_err(|e| LoadError::Config(format!("{}: {}", path.display(), e)))
    }

    fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

impl AuditConfig {
    /// Layers the file config and the CLI overrides over the defaults
    pub fn resolve(file: FileConfig, cli: ConfigOverrides) -> Result<Self, LoadError> {
        let defaults = Self::default();

        let config = Self {
            concurrency: cli
                .concurrency
                .or(file.concurrency)
                .unwrap_or(defaults.concurrency),
            timeout: cli
                .timeout_secs
                .or(file.timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            placeholder: cli
                .placeholder
                .or(file.placeholder)
                .unwrap_or(defaults.placeholder),
            output_dir: cli
                .output_dir
                .or(file.output_dir)
                .unwrap_or(defaults.output_dir),
            max_redirects: cli
                .max_redirects
                .or(file.max_redirects)
                .unwrap_or(defaults.max_redirects),
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LoadError> {
        if self.concurrency == 0 {
            return Err(LoadError::Config("concurrency must be at least 1".into()));
        }
        if self.timeout.is_zero() {
            return Err(LoadError::Config("timeout must be at least 1 second".into()));
        }
        if self.placeholder.is_empty() {
            return Err(LoadError::Config("placeholder must not be empty".into()));
        }
        if self.retry.attempts == 0 {
            return Err(LoadError::Config("retry attempts must be at least 1".into()));
        }
        Ok(())
    }
}
