#![warn(missing_docs)]
//! mcsum Statistical Engine
//!
//! Single-pass aggregation of Monte Carlo exports, one estimator per variable and time step:
//! - Running arithmetic mean (incremental form)
//! - Exact running extrema
//! - Approximate quantiles via an adaptive stochastic-approximation recursion
//! - End-of-stream bias correction blending quantile estimates with the observed extrema
//!
//! No raw samples are retained. Memory is `O(variables × time steps × quantiles)` regardless of
//! how many scenarios are streamed through.

mod correction;
mod error;
mod quantile;
mod store;
mod variable;

pub use correction::{
    ClampMode, FinalizeOptions, FinalizeScope, bias_weights, finalize_variable,
};
pub use error::StatsError;
pub use quantile::{QuantileTarget, QuantileTrack, sign};
pub use store::AggregationStateStore;
pub use variable::{Extrema, TrackingMode, VariableStats};

/// Quantiles tracked when none are configured
pub const DEFAULT_QUANTILES: [f64; 3] = [0.25, 0.50, 0.75];

/// Gain applied to the adaptive scale in each quantile step
pub const STEP_GAIN: f64 = 1.5;

/// Exponent applied to the scenario count when weighting the bias correction.
///
/// Found empirically; larger values trust the online estimate sooner.
pub const PENALTY_EXPONENT: f64 = 0.66;
