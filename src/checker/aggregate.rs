// src/checker/aggregate.rs
// Splits a domain's probe results into working (exactly HTTP 200) and failed.

use super::probe::ProbeResult;

/// A domain's results, partitioned; relative order is preserved on both sides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    pub working: Vec<ProbeResult>,
    pub failed: Vec<ProbeResult>,
}

impl Aggregate {
    pub fn working_count(&self) -> usize {
        self.working.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn total(&self) -> usize {
        self.working.len() + self.failed.len()
    }
}

pub fn aggregate(results: Vec<ProbeResult>) -> Aggregate {
    let (working, failed) = results.into_iter().partition(ProbeResult::is_working);
    Aggregate { working, failed }
}
