//! Report Metadata

use std::path::Path;

use chrono::Utc;
use mcsum_report::{ReportMeta, SCHEMA_VERSION};
use mcsum_stats::{ClampMode, FinalizeOptions, FinalizeScope};

use crate::pipeline::Summary;

/// Build the metadata block for a finished run
pub fn build_report_meta(
    summary: &Summary,
    input: Option<&Path>,
    finalize: FinalizeOptions,
) -> ReportMeta {
    ReportMeta {
        schema_version: SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION").to_string(),
        generated_at: Utc::now(),
        input: input.map(|p| p.display().to_string()),
        scenario_count: summary.scenario_count(),
        variable_count: summary.store.len(),
        skipped_rows: summary.skipped_rows,
        last_step_corrected: finalize.scope == FinalizeScope::AllSteps,
        clamped_to_range: finalize.clamp == ClampMode::ObservedRange,
    }
}
