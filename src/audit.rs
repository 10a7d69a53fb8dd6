// src/audit.rs
// =============================================================================
// The audit loop: every domain, one after the other.
//
// For each domain, in input order:
// 1. probe all backlink templates (checker::run_for_domain)
// 2. split the results into working / failed
// 3. write the HTML report; if that fails, log it and carry on
// 4. log a one-line summary
//
// Domains are never processed in parallel; only the probes inside a domain
// are. A domain's report failure never stops the run.
// =============================================================================

use crate::checker::{
    aggregate, run_for_domain, HttpTransport, LogProgress, ProgressObserver, Transport,
};
use crate::config::AuditConfig;
use crate::error::LoadError;
use crate::input::BacklinkTemplate;
use crate::report;
use chrono::Local;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info};

/// Outcome of auditing one domain
#[derive(Debug, Clone, Serialize)]
pub struct DomainSummary {
    pub domain: String,
    pub working: usize,
    pub failed: usize,
    /// Where the report was written, if it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_error: Option<String>,
}

/// Outcome of a whole run, one entry per input domain in input order
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub domains: Vec<DomainSummary>,
    pub total_working: usize,
    pub total_failed: usize,
    pub reports_failed: usize,
}

impl RunSummary {
    /// Every backlink worked and every report was written
    pub fn is_clean(&self) -> bool {
        self.total_failed == 0 && self.reports_failed == 0
    }

    fn push(&mut self, domain: DomainSummary) {
        self.total_working += domain.working;
        self.total_failed += domain.failed;
        if domain.report_error.is_some() {
            self.reports_failed += 1;
        }
        self.domains.push(domain);
    }
}

pub struct Auditor<T: Transport> {
    config: AuditConfig,
    transport: T,
    observer: Box<dyn ProgressObserver>,
}

impl Auditor<HttpTransport> {
    /// An auditor talking to the real network
    pub fn new(config: AuditConfig) -> reqwest::Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> Auditor<T> {
    pub fn with_transport(config: AuditConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            observer: Box::new(LogProgress),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Audits every domain against every template
    ///
    /// Fails only when there is nothing to audit; per-domain problems end up
    /// in the returned summary.
    pub async fn run(
        &self,
        domains: &[String],
        templates: &[BacklinkTemplate],
    ) -> Result<RunSummary, LoadError> {
        if domains.is_empty() {
            return Err(LoadError::Empty { what: "domains" });
        }
        if templates.is_empty() {
            return Err(LoadError::Empty { what: "backlinks" });
        }

        info!(
            "Starting audit of {} domain(s) with {} backlink(s) each",
            domains.len(),
            templates.len()
        );

        let mut summary = RunSummary::default();
        for (index, domain) in domains.iter().enumerate() {
            self.observer.on_domain_start(index + 1, domains.len(), domain);
            summary.push(self.audit_domain(domain, templates).await);
        }

        info!(
            "Audit finished: {} working, {} failed, {} report(s) not written",
            summary.total_working, summary.total_failed, summary.reports_failed
        );
        Ok(summary)
    }

    async fn audit_domain(&self, domain: &str, templates: &[BacklinkTemplate]) -> DomainSummary {
        info!("Processing domain: {}", domain);

        let results = run_for_domain(
            &self.transport,
            domain,
            templates,
            &self.config,
            self.observer.as_ref(),
        )
        .await;
        let results = aggregate(results);

        let (report, report_error) =
            match report::write_report(&self.config.output_dir, domain, &results, Local::now()) {
                Ok(path) => (Some(path), None),
                Err(e) => {
                    error!("No report for {}: {}", domain, e);
                    (None, Some(e.to_string()))
                }
            };

        info!(
            "{}: {} working, {} failed (of {})",
            domain,
            results.working_count(),
            results.failed_count(),
            results.total()
        );

        DomainSummary {
            domain: domain.to_string(),
            working: results.working_count(),
            failed: results.failed_count(),
            report,
            report_error,
        }
    }
}
