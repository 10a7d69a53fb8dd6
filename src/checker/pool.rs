// src/checker/pool.rs
// =============================================================================
// Runs the probes for one domain with bounded concurrency.
//
// How it works:
// 1. Every template becomes one task: resolve the URL, then probe it
// 2. Up to `concurrency` tasks are in flight at once (buffer_unordered)
// 3. Tasks finish in any order. Each task hands back the URL it resolved
//    itself together with its input position, and the result is stored in
//    that position. Identity never comes from the order of completion.
// 4. When the stream is drained every task has finished; the pool is
//    dropped before the caller moves on to aggregation.
//
// The output therefore has exactly one ProbeResult per template, in
// template order, whatever the network timing was.
// =============================================================================

use super::probe::{probe, ProbeResult, Transport};
use super::substitute::resolve;
use crate::config::AuditConfig;
use crate::input::BacklinkTemplate;
use futures::stream::{self, StreamExt};
use tracing::debug;

/// Receives advisory progress while a domain is being probed
pub trait ProgressObserver: Send + Sync {
    /// Called before a domain's probes start; `position` is 1-based
    fn on_domain_start(&self, _position: usize, _count: usize, _domain: &str) {}

    /// Called after each completed task
    fn on_progress(&self, domain: &str, completed: usize, total: usize);
}

/// Observer that only writes to the debug log
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_progress(&self, domain: &str, completed: usize, total: usize) {
        debug!("{}: {}/{} backlinks checked", domain, completed, total);
    }
}

/// Probes every template for `domain` and returns the results in template order
pub async fn run_for_domain<T>(
    transport: &T,
    domain: &str,
    templates: &[BacklinkTemplate],
    config: &AuditConfig,
    observer: &dyn ProgressObserver,
) -> Vec<ProbeResult>
where
    T: Transport + ?Sized,
{
    let total = templates.len();
    let retry = config.retry;

    let tasks = templates.iter().enumerate().map(|(index, template)| {
        let url = resolve(&template.url, &config.placeholder, domain);
        async move {
            let outcome = probe(transport, &url, retry).await;
            (index, ProbeResult { url, outcome })
        }
    });

    let mut completions = stream::iter(tasks).buffer_unordered(config.concurrency.max(1));

    let mut slots: Vec<Option<ProbeResult>> = vec![None; total];
    let mut completed = 0;

    while let Some((index, result)) = completions.next().await {
        slots[index] = Some(result);
        completed += 1;
        observer.on_progress(domain, completed, total);
    }

    let results: Vec<ProbeResult> = slots.into_iter().flatten().collect();
    debug_assert_eq!(results.len(), total);
    results
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why not just zip the completions with the template list?
//    - buffer_unordered yields results in the order they FINISH
//    - The 3rd completion is not the 3rd template
//    - So each future returns its own (index, url) and we put it back in place
//
// 2. Why Vec<Option<ProbeResult>>?
//    - Slots are filled in random order; None marks "not finished yet"
//    - flatten() drops the Option wrapper once every slot is filled
//
// 3. Where are the "workers"?
//    - There are no threads per task: buffer_unordered keeps at most N
//      futures in flight and polls them all from this one task
//    - A slow or retrying URL keeps its slot busy until it is done
// -----------------------------------------------------------------------------
