// src/report/mod.rs
// =============================================================================
// This module produces the per-domain HTML reports.
//
// Submodules:
// - render: template rendering, file naming, writing, output dir checks
// =============================================================================

mod render;

pub use render::{prepare_output_dir, write_report};
