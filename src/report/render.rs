// src/report/render.rs
// =============================================================================
// This module turns one domain's aggregated results into an HTML report and
// writes it to the output directory.
//
// Steps:
// 1. render_document: fill the askama template (templates/report.html).
//    Pure: same inputs, same document.
// 2. write_report: pick the file name and persist the document
//
// Every URL and error message comes from outside (catalog, remote servers),
// so none of it is trusted. askama escapes everything interpolated into an
// .html template, and only http(s) URLs are turned into clickable links.
//
// File names look like:
//   reports/report_example.com_20240315_103005.html
// =============================================================================

use crate::checker::{Aggregate, ProbeOutcome, ProbeResult};
use crate::error::{ReportWriteError, SetupError};
use askama::Template;
use chrono::{DateTime, Local};
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    domain: &'a str,
    generated_at: String,
    working: Vec<Row<'a>>,
    failed: Vec<Row<'a>>,
}

struct Row<'a> {
    url: &'a str,
    linkable: bool,
    detail: String,
}

impl<'a> Row<'a> {
    fn from_result(result: &'a ProbeResult) -> Self {
        Self {
            url: &result.url,
            linkable: result.url.starts_with("http://") || result.url.starts_with("https://"),
            detail: match &result.outcome {
                ProbeOutcome::Status(code) if result.is_working() => code.to_string(),
                outcome => outcome.to_string(),
            },
        }
    }
}

/// Renders the report document for `domain`
pub fn render_document(
    domain: &str,
    results: &Aggregate,
    generated_at: DateTime<Local>,
) -> Result<String, askama::Error> {
    let template = ReportTemplate {
        domain,
        generated_at: generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        working: results.working.iter().map(Row::from_result).collect(),
        failed: results.failed.iter().map(Row::from_result).collect(),
    };
    template.render()
}

/// `report_<domain>_<YYYYmmdd_HHMMSS>.html`, with the domain made filename-safe
pub fn report_file_name(domain: &str, generated_at: DateTime<Local>) -> String {
    let safe_domain: String = domain
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!(
        "report_{}_{}.html",
        safe_domain,
        generated_at.format("%Y%m%d_%H%M%S")
    )
}

/// Renders and writes the report, returning where it was written
///
/// An existing file is never overwritten: a second report for the same name
/// within the same second gets a `_2`, `_3`... suffix.
pub fn write_report(
    output_dir: &Path,
    domain: &str,
    results: &Aggregate,
    generated_at: DateTime<Local>,
) -> Result<PathBuf, ReportWriteError> {
    let document =
        render_document(domain, results, generated_at).map_err(|source| ReportWriteError::Render {
            domain: domain.to_string(),
            source,
        })?;

    let path = persist(
        output_dir,
        &report_file_name(domain, generated_at),
        document.as_bytes(),
    )?;
    info!("Report written: {}", path.display());
    Ok(path)
}

// The document is staged in a temporary file inside `output_dir` and only
// linked under its final name once fully written. On any failure the staged
// file is dropped, so no partial report is ever left behind.
fn persist(
    output_dir: &Path,
    file_name: &str,
    mut contents: impl Read,
) -> Result<PathBuf, ReportWriteError> {
    let io_error = |path: PathBuf| move |source| ReportWriteError::Io { path, source };
    let first_choice = output_dir.join(file_name);

    let mut staged = tempfile::Builder::new()
        .prefix(".report_")
        .suffix(".tmp")
        .tempfile_in(output_dir)
        .map_err(io_error(first_choice.clone()))?;

    io::copy(&mut contents, &mut staged).map_err(io_error(first_choice.clone()))?;
    staged
        .as_file()
        .sync_all()
        .map_err(io_error(first_choice.clone()))?;

    let stem = file_name.trim_end_matches(".html");
    let mut suffix = 1;
    loop {
        let path = if suffix == 1 {
            first_choice.clone()
        } else {
            output_dir.join(format!("{}_{}.html", stem, suffix))
        };

        match staged.persist_noclobber(&path) {
            Ok(_) => return Ok(path),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                staged = e.file;
                suffix += 1;
            }
            Err(e) => return Err(ReportWriteError::Io { path, source: e.error }),
        }
    }
}

/// Creates the output directory and checks that files can be written into it
pub fn prepare_output_dir(dir: &Path) -> Result<(), SetupError> {
    let setup_error = |source| SetupError {
        path: dir.to_path_buf(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(setup_error)?;

    let probe_file = dir.join(".write_test.tmp");
    std::fs::write(&probe_file, b"test").map_err(setup_error)?;
    std::fs::remove_file(&probe_file).map_err(setup_error)?;

    info!("Output directory ready: {}", dir.display());
    Ok(())
}
