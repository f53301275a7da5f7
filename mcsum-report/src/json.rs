//! JSON Output

use chrono::{DateTime, Utc};
use mcsum_decode::TimeAxis;
use serde::{Deserialize, Serialize};

use crate::table::StatisticTable;

/// Current JSON schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Run metadata included in the JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    /// JSON schema version
    pub schema_version: u32,
    /// mcsum version that wrote the report
    pub version: String,
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
    /// Input export, when read from a file
    pub input: Option<String>,
    /// Final scenario count `N`
    pub scenario_count: u64,
    /// Number of aggregated variables
    pub variable_count: usize,
    /// Rows dropped as skipped variables
    pub skipped_rows: u64,
    /// Whether the final time step was bias-corrected
    pub last_step_corrected: bool,
    /// Whether quantiles were clamped to the observed range
    pub clamped_to_range: bool,
}

/// One variable's row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRow {
    /// Variable name
    pub variable: String,
    /// One value per time step
    pub values: Vec<f64>,
}

/// One statistic's table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonTable {
    /// Statistic name, also the delimited file stem
    pub statistic: String,
    /// Rows in variable name order
    pub rows: Vec<JsonRow>,
}

/// Complete JSON report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    /// Run metadata
    pub meta: ReportMeta,
    /// Time-axis labels from the header row
    pub time_axis: Vec<String>,
    /// One table per statistic
    pub tables: Vec<JsonTable>,
}

impl ReportDocument {
    /// Assemble a document from finished tables
    pub fn new(meta: ReportMeta, axis: &TimeAxis, tables: &[StatisticTable]) -> Self {
        Self {
            meta,
            time_axis: axis.labels.clone(),
            tables: tables
                .iter()
                .map(|t| JsonTable {
                    statistic: t.name.clone(),
                    rows: t
                        .rows
                        .iter()
                        .map(|(variable, values)| JsonRow {
                            variable: variable.clone(),
                            values: values.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Generate a prettified JSON report.
pub fn generate_json_report(
    meta: ReportMeta,
    axis: &TimeAxis,
    tables: &[StatisticTable],
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ReportDocument::new(meta, axis, tables))
}
