//! Aggregation errors

use thiserror::Error;

/// Errors raised by the aggregation core
///
/// Every variant is fatal for a run: the estimators divide by the running scenario count, so
/// continuing after any of these would silently corrupt the results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// A variable was looked up or updated before its scenario-1 observation
    #[error("Unknown variable '{variable}' at scenario {scenario}: not seen in scenario 1")]
    UnknownVariable {
        /// Variable name
        variable: String,
        /// Scenario being processed
        scenario: u64,
    },

    /// A variable was initialized twice
    #[error("Variable '{variable}' is already initialized")]
    AlreadyInitialized {
        /// Variable name
        variable: String,
    },

    /// A scenario supplied a different number of values than the first observation
    #[error("Dimension mismatch for '{variable}': expected {expected} values, found {found}")]
    DimensionMismatch {
        /// Variable name
        variable: String,
        /// Length fixed at scenario 1
        expected: usize,
        /// Length supplied now
        found: usize,
    },

    /// Scenario numbers did not advance strictly by one from 1
    #[error("Out-of-order scenario for '{variable}': expected scenario {expected}, found {found}")]
    OutOfOrderScenario {
        /// Variable name
        variable: String,
        /// Scenario number that would have been valid
        expected: u64,
        /// Scenario number supplied
        found: u64,
    },

    /// A variable has no row in one or more trailing scenarios
    #[error("Variable '{variable}' seen in {observations} of {scenarios} scenarios")]
    IncompleteVariable {
        /// Variable name
        variable: String,
        /// Scenarios this variable was observed in
        observations: u64,
        /// Final scenario count
        scenarios: u64,
    },

    /// Quantile level outside the open interval (0, 1)
    #[error("Invalid quantile {0}: must lie strictly between 0 and 1")]
    InvalidQuantile(f64),

    /// Full tracking requested without any quantile
    #[error("At least one quantile is required for full tracking")]
    NoQuantiles,

    /// The store was mutated or finalized after finalization
    #[error("Aggregation state has already been finalized")]
    AlreadyFinalized,
}
