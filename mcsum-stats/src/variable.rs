//! Per-Variable Estimator State
//!
//! A [`VariableStats`] is sized once from the variable's first observation and never resized.
//! Every vector it owns has the same length `T`.

use crate::quantile::{QuantileTarget, QuantileTrack};

/// Which statistics a run keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingMode {
    /// Mean, extrema, and quantiles
    #[default]
    Full,
    /// Running mean only
    MeanOnly,
}

/// Exact running extrema per time step
#[derive(Debug, Clone, PartialEq)]
pub struct Extrema {
    /// Smallest value seen per time step
    pub min: Vec<f64>,
    /// Largest value seen per time step
    pub max: Vec<f64>,
}

/// Streaming state for one variable
#[derive(Debug, Clone, PartialEq)]
pub struct VariableStats {
    mean: Vec<f64>,
    extrema: Option<Extrema>,
    quantiles: Vec<QuantileTrack>,
    observations: u64,
}

impl VariableStats {
    /// Initialize from the scenario-1 values
    ///
    /// Mean, extrema, and every quantile estimate start at `values`; every scale starts at 0.
    pub fn initialize(values: &[f64], targets: &[QuantileTarget], mode: TrackingMode) -> Self {
        let (extrema, quantiles) = match mode {
            TrackingMode::Full => (
                Some(Extrema {
                    min: values.to_vec(),
                    max: values.to_vec(),
                }),
                targets
                    .iter()
                    .map(|&t| QuantileTrack::seed(t, values))
                    .collect(),
            ),
            TrackingMode::MeanOnly => (None, Vec::new()),
        };

        Self {
            mean: values.to_vec(),
            extrema,
            quantiles,
            observations: 1,
        }
    }

    /// Number of time steps `T`
    pub fn time_steps(&self) -> usize {
        self.mean.len()
    }

    /// Number of scenarios folded in so far
    pub fn observations(&self) -> u64 {
        self.observations
    }

    /// Running mean per time step
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Running minimum per time step (absent in mean-only mode)
    pub fn min(&self) -> Option<&[f64]> {
        self.extrema.as_ref().map(|e| e.min.as_slice())
    }

    /// Running maximum per time step (absent in mean-only mode)
    pub fn max(&self) -> Option<&[f64]> {
        self.extrema.as_ref().map(|e| e.max.as_slice())
    }

    /// Extrema, if tracked
    pub fn extrema(&self) -> Option<&Extrema> {
        self.extrema.as_ref()
    }

    /// All quantile tracks, ascending by level
    pub fn quantiles(&self) -> &[QuantileTrack] {
        &self.quantiles
    }

    /// Estimates for a single quantile level
    pub fn quantile(&self, target: QuantileTarget) -> Option<&[f64]> {
        self.quantiles
            .iter()
            .find(|t| t.target() == target)
            .map(|t| t.estimate())
    }

    pub(crate) fn parts_mut(&mut self) -> (Option<&Extrema>, &mut [QuantileTrack]) {
        (self.extrema.as_ref(), self.quantiles.as_mut_slice())
    }

    /// Fold in scenario `n`. The caller has checked ordering and length.
    pub(crate) fn absorb(&mut self, n: u64, values: &[f64]) {
        debug_assert_eq!(n, self.observations + 1);
        debug_assert_eq!(values.len(), self.mean.len());

        let nf = n as f64;
        for (j, &v) in values.iter().enumerate() {
            self.mean[j] += (v - self.mean[j]) / nf;

            if let Some(extrema) = self.extrema.as_mut() {
                extrema.max[j] = extrema.max[j].max(v);
                extrema.min[j] = extrema.min[j].min(v);
            }

            for track in &mut self.quantiles {
                track.step(j, v, nf);
            }
        }
        self.observations = n;
    }
}
