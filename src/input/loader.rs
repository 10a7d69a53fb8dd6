// src/input/loader.rs
// =============================================================================
// Loaders for the domain list and the backlink catalog.
//
// Domain file format:
//   example.com
//   another-site.org
//
//   (blank lines are ignored, surrounding whitespace trimmed)
//
// Backlink catalog format:
//   [
//     { "url": "http://directory.test/listing?site=vostroportale.com" },
//     { "url": "https://blog.test/vostroportale.com/review" }
//   ]
//
// Any failure here is fatal: the audit never starts on partial input.
// =============================================================================

use crate::error::LoadError;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// One entry of the backlink catalog
///
/// Extra keys in a record are ignored; a missing or non-string `url` is not.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BacklinkTemplate {
    pub url: String,
}

#[cfg(test)]
impl BacklinkTemplate {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Reads the domain list, preserving order and duplicates
pub fn load_domains(path: &Path) -> Result<Vec<String>, LoadError> {
    let text = read_file(path)?;

    let domains: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if domains.is_empty() {
        return Err(LoadError::Empty { what: "domains" });
    }

    info!("Loaded {} domain(s) from {}", domains.len(), path.display());
    Ok(domains)
}

/// Reads the backlink catalog
///
/// Templates that do not contain `placeholder` are kept (they resolve to
/// themselves) but reported, since they are almost always a catalog mistake.
pub fn load_backlinks(path: &Path, placeholder: &str) -> Result<Vec<BacklinkTemplate>, LoadError> {
    let text = read_file(path)?;

    let templates: Vec<BacklinkTemplate> =
        serde_json::from_str(&text).map_err(|source| LoadError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    if templates.is_empty() {
        return Err(LoadError::Empty { what: "backlinks" });
    }

    for template in templates.iter().filter(|t| !t.url.contains(placeholder)) {
        warn!("Backlink without placeholder '{}': {}", placeholder, template.url);
    }

    info!("Loaded {} backlink(s) from {}", templates.len(), path.display());
    Ok(templates)
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound { path: path.to_path_buf() });
    }

    std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}
