// src/input/mod.rs
// =============================================================================
// This module reads the two lists an audit needs:
// - the domains to audit (plain text, one per line)
// - the backlink catalog (JSON array of { "url": "..." } records)
//
// Both are loaded once at startup and never change during the run.
// =============================================================================

mod loader;

pub use loader::{load_backlinks, load_domains, BacklinkTemplate};
