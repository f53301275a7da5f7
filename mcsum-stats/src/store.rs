//! Aggregation State Store
//!
//! Owns one [`VariableStats`] per variable name and enforces the ordering contract the
//! streaming update depends on: scenarios arrive as 1, 2, 3, … and every variable is observed
//! exactly once per scenario.
//!
//! Variables are kept in a `BTreeMap`, so iteration is always in lexicographic name order.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::debug;

use crate::correction::{FinalizeOptions, finalize_variable};
use crate::error::StatsError;
use crate::quantile::QuantileTarget;
use crate::variable::{TrackingMode, VariableStats};

/// Streaming aggregation state for a whole run
#[derive(Debug, Clone)]
pub struct AggregationStateStore {
    variables: BTreeMap<String, VariableStats>,
    targets: Vec<QuantileTarget>,
    mode: TrackingMode,
    scenario: u64,
    finalized: bool,
}

impl Default for AggregationStateStore {
    fn default() -> Self {
        Self {
            variables: BTreeMap::new(),
            targets: QuantileTarget::defaults(),
            mode: TrackingMode::Full,
            scenario: 0,
            finalized: false,
        }
    }
}

impl AggregationStateStore {
    /// Create a store tracking `targets` (sorted and deduplicated) in the given mode
    ///
    /// Full tracking needs at least one quantile; mean-only ignores `targets`.
    pub fn new(mut targets: Vec<QuantileTarget>, mode: TrackingMode) -> Result<Self, StatsError> {
        match mode {
            TrackingMode::Full => {
                if targets.is_empty() {
                    return Err(StatsError::NoQuantiles);
                }
                targets.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                targets.dedup();
            }
            TrackingMode::MeanOnly => targets.clear(),
        }

        Ok(Self {
            targets,
            mode,
            ..Self::default()
        })
    }

    /// Mean-only store
    pub fn mean_only() -> Self {
        Self {
            targets: Vec::new(),
            mode: TrackingMode::MeanOnly,
            ..Self::default()
        }
    }

    /// Quantiles tracked, ascending
    pub fn targets(&self) -> &[QuantileTarget] {
        &self.targets
    }

    /// Tracking mode
    pub fn mode(&self) -> TrackingMode {
        self.mode
    }

    /// Last scenario number folded in (0 before any observation)
    pub fn scenario_count(&self) -> u64 {
        self.scenario
    }

    /// Number of distinct variables
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether no variable has been observed
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Whether [`finalize`](Self::finalize) has run
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Look up a variable's state
    pub fn get(&self, variable: &str) -> Result<&VariableStats, StatsError> {
        self.variables
            .get(variable)
            .ok_or_else(|| StatsError::UnknownVariable {
                variable: variable.to_string(),
                scenario: self.scenario,
            })
    }

    /// Variables and their state in lexicographic name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariableStats)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Create the state for a variable from its scenario-1 values
    pub fn initialize(&mut self, variable: &str, values: &[f64]) -> Result<(), StatsError> {
        self.ensure_open()?;
        if self.variables.contains_key(variable) {
            return Err(StatsError::AlreadyInitialized {
                variable: variable.to_string(),
            });
        }

        debug!(variable, time_steps = values.len(), "initializing variable");
        self.variables.insert(
            variable.to_string(),
            VariableStats::initialize(values, &self.targets, self.mode),
        );
        Ok(())
    }

    /// Fold scenario `scenario` (≥ 2) of an already initialized variable
    pub fn update(
        &mut self,
        variable: &str,
        scenario: u64,
        values: &[f64],
    ) -> Result<(), StatsError> {
        self.ensure_open()?;
        let current = self.scenario;
        let stats = self
            .variables
            .get_mut(variable)
            .ok_or_else(|| StatsError::UnknownVariable {
                variable: variable.to_string(),
                scenario,
            })?;

        let expected = stats.observations() + 1;
        if scenario != expected {
            return Err(StatsError::OutOfOrderScenario {
                variable: variable.to_string(),
                expected,
                found: scenario,
            });
        }
        if values.len() != stats.time_steps() {
            return Err(StatsError::DimensionMismatch {
                variable: variable.to_string(),
                expected: stats.time_steps(),
                found: values.len(),
            });
        }

        stats.absorb(scenario, values);
        self.scenario = current.max(scenario);
        Ok(())
    }

    /// Route one decoded row: scenario 1 initializes, later scenarios update
    ///
    /// Scenario numbers must start at 1 and never move backwards or skip ahead.
    pub fn observe(
        &mut self,
        scenario: u64,
        variable: &str,
        values: &[f64],
    ) -> Result<(), StatsError> {
        self.ensure_open()?;
        if scenario == 0 || scenario < self.scenario || scenario > self.scenario + 1 {
            let expected = if scenario < self.scenario {
                self.scenario
            } else {
                self.scenario + 1
            };
            return Err(StatsError::OutOfOrderScenario {
                variable: variable.to_string(),
                expected,
                found: scenario,
            });
        }

        if scenario == 1 {
            self.initialize(variable, values).map_err(|e| match e {
                // Seen twice within scenario 1
                StatsError::AlreadyInitialized { variable } => StatsError::OutOfOrderScenario {
                    variable,
                    expected: 2,
                    found: 1,
                },
                other => other,
            })?;
            self.scenario = 1;
            Ok(())
        } else {
            self.update(variable, scenario, values)
        }
    }

    /// Apply the end-of-stream bias correction to every variable
    ///
    /// Uses the final scenario count for all variables. Every variable must have been observed
    /// in every scenario, including the last. Runs once; variables are corrected in parallel on
    /// the rayon pool.
    pub fn finalize(&mut self, options: FinalizeOptions) -> Result<(), StatsError> {
        self.ensure_open()?;
        let n = self.scenario;
        if let Some((name, stats)) = self
            .variables
            .iter()
            .find(|(_, stats)| stats.observations() != n)
        {
            return Err(StatsError::IncompleteVariable {
                variable: name.clone(),
                observations: stats.observations(),
                scenarios: n,
            });
        }

        self.variables
            .par_iter_mut()
            .for_each(|(_, stats)| finalize_variable(stats, n, options));
        self.finalized = true;
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), StatsError> {
        if self.finalized {
            Err(StatsError::AlreadyFinalized)
        } else {
            Ok(())
        }
    }
}
