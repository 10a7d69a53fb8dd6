// src/checker/mod.rs
// =============================================================================
// This module contains all backlink checking logic.
//
// Submodules:
// - substitute: Puts the audited domain into a backlink template
// - probe: One HTTP check of one URL, with retries
// - pool: Runs the probes of one domain concurrently and keeps each result
//         attached to the URL it belongs to
// - aggregate: Splits results into working / failed
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

mod aggregate;
mod pool;
mod probe;
mod substitute;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregate::{aggregate, Aggregate};
pub use pool::{run_for_domain, LogProgress, ProgressObserver};
pub use probe::{HttpTransport, ProbeOutcome, ProbeResult, Transport};
