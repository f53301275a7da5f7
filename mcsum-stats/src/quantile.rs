//! Online Quantile Estimation
//!
//! Each tracked quantile keeps, per time step, a current estimate and an adaptive scale.
//! The scale is a count-damped running mean absolute deviation of samples from the estimate,
//! and it sets the step size of the next move, so no fixed learning rate is needed.
//!
//! ```text
//! scale    ← scale + ((|estimate − v| + scale)/n − 2·scale)/n
//! estimate ← estimate + 1.5 · scale · (sign(v − estimate) + 2p − 1)
//! ```
//!
//! The recursion depends on visitation order: feeding the same samples in a different order
//! gives different estimates.

use crate::STEP_GAIN;
use crate::error::StatsError;

/// Sign function with `sign(0) = 0`
///
/// `f64::signum` maps `0.0` to `1.0`, which would bias the estimator whenever a sample lands
/// exactly on the estimate. NaN propagates.
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else if x == 0.0 {
        0.0
    } else {
        x
    }
}

/// A quantile level strictly inside (0, 1)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct QuantileTarget(f64);

impl QuantileTarget {
    /// Create a target, rejecting levels outside the open unit interval (and NaN)
    pub fn new(p: f64) -> Result<Self, StatsError> {
        if p > 0.0 && p < 1.0 {
            Ok(Self(p))
        } else {
            Err(StatsError::InvalidQuantile(p))
        }
    }

    /// The default quartile set (0.25, 0.50, 0.75)
    pub fn defaults() -> Vec<Self> {
        crate::DEFAULT_QUANTILES.iter().map(|&p| Self(p)).collect()
    }

    /// Quantile level
    pub fn p(self) -> f64 {
        self.0
    }

    /// Short label built from the percentage digits: `q25`, `q50`, `q05`, `q999`
    pub fn label(self) -> String {
        let repr = format!("{}", self.0);
        let mut digits = repr.trim_start_matches("0.").to_string();
        if digits.len() == 1 {
            digits.push('0');
        }
        format!("q{}", digits)
    }
}

impl std::fmt::Display for QuantileTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Estimator state for one quantile across all time steps of a variable
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileTrack {
    target: QuantileTarget,
    estimate: Vec<f64>,
    scale: Vec<f64>,
}

impl QuantileTrack {
    /// Seed the track from the first scenario: estimate = values, scale = 0
    pub fn seed(target: QuantileTarget, values: &[f64]) -> Self {
        Self {
            target,
            estimate: values.to_vec(),
            scale: vec![0.0; values.len()],
        }
    }

    /// Quantile this track estimates
    pub fn target(&self) -> QuantileTarget {
        self.target
    }

    /// Current per-time-step estimates
    pub fn estimate(&self) -> &[f64] {
        &self.estimate
    }

    /// Current per-time-step adaptive scales
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    pub(crate) fn estimate_mut(&mut self) -> &mut [f64] {
        &mut self.estimate
    }

    /// Fold the sample `v` of scenario `n` into time step `j`
    #[inline]
    pub(crate) fn step(&mut self, j: usize, v: f64, n: f64) {
        let p = self.target.0;
        let q = self.estimate[j];
        let s = self.scale[j];

        // Scale uses the estimate from before this step
        let s = s + (((q - v).abs() + s) / n - 2.0 * s) / n;
        self.scale[j] = s;
        self.estimate[j] = q + STEP_GAIN * s * (sign(v - q) + 2.0 * p - 1.0);
    }
}
