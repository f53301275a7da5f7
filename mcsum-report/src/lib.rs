#![warn(missing_docs)]
//! mcsum Report - Per-Statistic Tables
//!
//! Generates one table per statistic (mean, min, max, each corrected quantile):
//! - Tab-delimited `.tab` files (spreadsheet-compatible, the export's own format)
//! - Comma-delimited `.csv` files, quoted where a name contains a comma
//! - A single JSON document with every table

mod delimited;
mod error;
mod json;
mod output;
mod table;

pub use delimited::write_delimited_table;
pub use error::ReportError;
pub use json::{
    JsonRow, JsonTable, ReportDocument, ReportMeta, SCHEMA_VERSION, generate_json_report,
};
pub use output::write_report;
pub use table::{Statistic, StatisticTable, build_tables};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Tab-delimited, one `.tab` file per statistic
    #[default]
    Tab,
    /// Comma-delimited, one `.csv` file per statistic
    Csv,
    /// One `summary.json` with all tables
    Json,
}

impl OutputFormat {
    /// File extension written for this format
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Tab => "tab",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    /// Field delimiter for the delimited formats
    pub fn delimiter(self) -> Option<u8> {
        match self {
            OutputFormat::Tab => Some(b'\t'),
            OutputFormat::Csv => Some(b','),
            OutputFormat::Json => None,
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tab" | "tsv" | "tabs" => Ok(OutputFormat::Tab),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}
