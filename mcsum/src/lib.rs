#![warn(missing_docs)]
//! # mcsum
//!
//! Single-pass summary statistics for Monte Carlo simulation exports.
//!
//! An export has one row per scenario-variable pair and one column per time step. mcsum streams
//! it once and produces, for every variable and time step:
//! - **Mean**: running arithmetic mean
//! - **Min / Max**: exact extrema
//! - **Quantiles**: approximate 25th/50th/75th percentiles from an adaptive online estimator,
//!   bias-corrected against the extrema at end of stream
//!
//! Memory does not grow with the number of scenarios.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mcsum::{AggregateOptions, DecoderConfig, aggregate_reader, build_tables};
//!
//! let file = std::io::BufReader::new(std::fs::File::open("results.tab")?);
//! let summary = aggregate_reader(file, DecoderConfig::default(), AggregateOptions::default())?;
//! for table in build_tables(&summary.store)? {
//!     println!("{}: {} variables", table.name, table.rows.len());
//! }
//! ```

// Re-export the aggregation core
pub use mcsum_stats::{
    AggregationStateStore, ClampMode, FinalizeOptions, FinalizeScope, QuantileTarget,
    StatsError, TrackingMode, VariableStats, bias_weights,
};

// Re-export decoding
pub use mcsum_decode::{
    DecodeError, DecoderConfig, Record, RecordKey, RecordReader, TimeAxis, decode_line,
    parse_record_key,
};

// Re-export reporting
pub use mcsum_report::{
    OutputFormat, Statistic, StatisticTable, build_tables, write_delimited_table, write_report,
};

// Re-export orchestration
pub use mcsum_cli::{
    AggregateOptions, Aggregator, McsumConfig, PipelineError, RunOutput, Summary,
    aggregate_reader, summarize_file,
};

/// Run the mcsum CLI harness.
pub use mcsum_cli::run;
