//! Bias Correction
//!
//! The online quantile recursion is biased and noisy for small scenario counts and for levels
//! near 0 or 1. Finalization shrinks each estimate toward the exact extrema:
//!
//! ```text
//! penalty = N ^ 0.66
//! w_min   = (1 − p) ^ penalty
//! w_max   = p ^ penalty
//! q[j]    ← w_min·min[j] + w_max·max[j] + (1 − w_min − w_max)·q[j]
//! ```
//!
//! For `0 < p < 1` and `N ≥ 1` the three weights are non-negative and sum to 1, so the result
//! is a convex combination. The raw estimate is first clamped into `[min, max]`, which makes
//! the bound hold even when the recursion overshot the observed range. On short or skewed
//! streams that happens for a few percent of finalized values; [`ClampMode::Off`] applies the
//! bare formula instead and reproduces the legacy numbers exactly.

use crate::PENALTY_EXPONENT;
use crate::variable::VariableStats;

/// Which time steps finalization corrects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinalizeScope {
    /// Correct every time step
    #[default]
    AllSteps,
    /// Leave the final time step uncorrected (legacy behavior)
    ExcludeLastStep,
}

/// Whether finalized estimates are held inside the observed range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClampMode {
    /// Clamp the raw estimate into `[min, max]` before blending and the result after
    #[default]
    ObservedRange,
    /// Blend the raw estimate as is (legacy numbers, may leave the range)
    Off,
}

/// Finalization settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FinalizeOptions {
    /// Time steps to correct
    pub scope: FinalizeScope,
    /// Range clamping
    pub clamp: ClampMode,
}

/// Blend weights `(w_min, w_max)` for level `p` after `n` scenarios
///
/// Returns `(0, 0)` for `n = 0`, which leaves estimates untouched.
pub fn bias_weights(p: f64, n: u64) -> (f64, f64) {
    if n == 0 {
        return (0.0, 0.0);
    }
    let penalty = (n as f64).powf(PENALTY_EXPONENT);
    ((1.0 - p).powf(penalty), p.powf(penalty))
}

/// Apply the bias correction to every quantile track of one variable
///
/// Mean-only state has no extrema and no quantiles, so nothing happens.
pub fn finalize_variable(stats: &mut VariableStats, n: u64, options: FinalizeOptions) {
    if n == 0 {
        return;
    }

    let (extrema, tracks) = stats.parts_mut();
    let Some(extrema) = extrema else {
        return;
    };

    for track in tracks {
        let (w_min, w_max) = bias_weights(track.target().p(), n);
        let w_est = 1.0 - w_min - w_max;

        let estimate = track.estimate_mut();
        let limit = match options.scope {
            FinalizeScope::AllSteps => estimate.len(),
            FinalizeScope::ExcludeLastStep => estimate.len().saturating_sub(1),
        };

        for j in 0..limit {
            let lo = extrema.min[j];
            let hi = extrema.max[j];
            estimate[j] = match options.clamp {
                ClampMode::ObservedRange => {
                    // max/min rather than clamp: never panics on NaN
                    let raw = estimate[j].max(lo).min(hi);
                    let blended = w_min * lo + w_max * hi + w_est * raw;
                    // Rounding can leave the blend one ulp outside the range
                    blended.max(lo).min(hi)
                }
                ClampMode::Off => w_min * lo + w_max * hi + w_est * estimate[j],
            };
        }
    }
}
