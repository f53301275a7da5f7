//! Aggregation Pipeline
//!
//! Drives decoded records through the aggregation core in a single pass:
//!
//! ```text
//! RecordReader ──► Aggregator::ingest ──► AggregationStateStore::observe
//!                        │                         (per data row)
//!                        ├─ header  → time axis
//!                        └─ skipped → counted, progress only
//!
//! Aggregator::finish ──► finalize (bias correction) ──► Summary
//! ```

use std::io::BufRead;

use fxhash::FxHashSet;
use mcsum_decode::{DecodeError, DecoderConfig, Record, RecordReader, TimeAxis};
use mcsum_stats::{
    AggregationStateStore, FinalizeOptions, QuantileTarget, StatsError, TrackingMode,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort an aggregation run
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The aggregation core rejected a row or the finalization
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// The stream ended without a header row
    #[error("No '{sentinel}' header row found; the time axis is unknown")]
    MissingTimeAxis {
        /// Expected first field of the header
        sentinel: String,
    },

    /// A second header row differs from the first
    #[error("Header row conflicts with an earlier header ({previous} vs {found} labels)")]
    ConflictingTimeAxis {
        /// Label count of the first header
        previous: usize,
        /// Label count of the conflicting header
        found: usize,
    },

    /// An error with its 1-based input line
    #[error("line {line}: {source}")]
    AtLine {
        /// Line number
        line: usize,
        /// Underlying error
        #[source]
        source: Box<PipelineError>,
    },
}

/// Settings for one aggregation run
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Quantiles to estimate (ignored in mean-only mode)
    pub targets: Vec<QuantileTarget>,
    /// Statistics to keep
    pub mode: TrackingMode,
    /// Variable names dropped before aggregation
    pub skip_variables: Vec<String>,
    /// Log progress every N scenarios (0 disables)
    pub progress_interval: u64,
    /// Bias-correction settings
    pub finalize: FinalizeOptions,
    /// Header sentinel, used in error messages and output headers
    pub header_sentinel: String,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            targets: QuantileTarget::defaults(),
            mode: TrackingMode::Full,
            skip_variables: vec![mcsum_decode::NOISE_SEED_VARIABLE.to_string()],
            progress_interval: 1000,
            finalize: FinalizeOptions::default(),
            header_sentinel: mcsum_decode::DEFAULT_HEADER_SENTINEL.to_string(),
        }
    }
}

/// Finalized result of a run
#[derive(Debug, Clone)]
pub struct Summary {
    /// Time-axis labels from the header
    pub time_axis: TimeAxis,
    /// Finalized per-variable state
    pub store: AggregationStateStore,
    /// Rows dropped because their variable is skipped
    pub skipped_rows: u64,
    /// Data rows folded into the store
    pub aggregated_rows: u64,
}

impl Summary {
    /// Final scenario count `N`
    pub fn scenario_count(&self) -> u64 {
        self.store.scenario_count()
    }
}

/// Single-pass orchestration over decoded records
#[derive(Debug)]
pub struct Aggregator {
    store: AggregationStateStore,
    time_axis: Option<TimeAxis>,
    skip: FxHashSet<String>,
    options: AggregateOptions,
    last_seen_scenario: u64,
    skipped_rows: u64,
    aggregated_rows: u64,
}

impl Aggregator {
    /// Create an aggregator with an empty store
    pub fn new(options: AggregateOptions) -> Result<Self, PipelineError> {
        let store = AggregationStateStore::new(options.targets.clone(), options.mode)?;
        Ok(Self {
            store,
            time_axis: None,
            skip: options.skip_variables.iter().cloned().collect(),
            options,
            last_seen_scenario: 0,
            skipped_rows: 0,
            aggregated_rows: 0,
        })
    }

    /// Time axis, once a header has been seen
    pub fn time_axis(&self) -> Option<&TimeAxis> {
        self.time_axis.as_ref()
    }

    /// Current aggregation state
    pub fn store(&self) -> &AggregationStateStore {
        &self.store
    }

    /// Fold one record
    pub fn ingest(&mut self, record: Record) -> Result<(), PipelineError> {
        match record {
            Record::Header(axis) => self.set_time_axis(axis),
            Record::Data { key, values } => {
                self.note_scenario(key.scenario);
                if self.skip.contains(&key.variable) {
                    self.skipped_rows += 1;
                    return Ok(());
                }
                self.store.observe(key.scenario, &key.variable, &values)?;
                self.aggregated_rows += 1;
                Ok(())
            }
        }
    }

    /// Finalize the store and hand back the summary
    pub fn finish(mut self) -> Result<Summary, PipelineError> {
        let time_axis = self
            .time_axis
            .take()
            .ok_or_else(|| PipelineError::MissingTimeAxis {
                sentinel: self.options.header_sentinel.clone(),
            })?;

        for (name, stats) in self.store.iter() {
            if stats.time_steps() != time_axis.len() {
                warn!(
                    variable = name,
                    values = stats.time_steps(),
                    labels = time_axis.len(),
                    "variable length differs from the time axis"
                );
            }
        }

        self.store.finalize(self.options.finalize)?;
        info!(
            scenarios = self.store.scenario_count(),
            variables = self.store.len(),
            "aggregation finalized"
        );

        Ok(Summary {
            time_axis,
            store: self.store,
            skipped_rows: self.skipped_rows,
            aggregated_rows: self.aggregated_rows,
        })
    }

    fn set_time_axis(&mut self, axis: TimeAxis) -> Result<(), PipelineError> {
        match &self.time_axis {
            Some(previous) if *previous != axis => Err(PipelineError::ConflictingTimeAxis {
                previous: previous.len(),
                found: axis.len(),
            }),
            Some(_) => Ok(()),
            None => {
                debug!(time_steps = axis.len(), "time axis set");
                self.time_axis = Some(axis);
                Ok(())
            }
        }
    }

    fn note_scenario(&mut self, scenario: u64) {
        if scenario <= self.last_seen_scenario {
            return;
        }
        self.last_seen_scenario = scenario;
        let interval = self.options.progress_interval;
        if interval > 0 && scenario % interval == 0 {
            info!("{} scenarios processed", scenario);
        }
    }
}

/// Decode and aggregate a whole export
pub fn aggregate_reader<R: BufRead>(
    reader: R,
    decoder: DecoderConfig,
    options: AggregateOptions,
) -> Result<Summary, PipelineError> {
    let mut aggregator = Aggregator::new(options)?;
    for item in RecordReader::with_config(reader, decoder) {
        let numbered = item?;
        aggregator
            .ingest(numbered.record)
            .map_err(|e| PipelineError::AtLine {
                line: numbered.line,
                source: Box::new(e),
            })?;
    }
    aggregator.finish()
}
