//! Statistic Tables
//!
//! Flattens the finalized aggregation state into one table per statistic, rows sorted by
//! variable name.

use mcsum_stats::{AggregationStateStore, QuantileTarget, TrackingMode};

use crate::error::ReportError;

/// A reported statistic
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Statistic {
    /// Running mean
    Mean,
    /// Exact minimum
    Min,
    /// Exact maximum
    Max,
    /// Bias-corrected quantile estimate
    Quantile(QuantileTarget),
}

impl Statistic {
    /// File stem used for this statistic: `mean`, `min`, `max`, `q25`, …
    pub fn file_stem(self) -> String {
        match self {
            Statistic::Mean => "mean".to_string(),
            Statistic::Min => "min".to_string(),
            Statistic::Max => "max".to_string(),
            Statistic::Quantile(target) => target.label(),
        }
    }
}

impl std::fmt::Display for Statistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.file_stem())
    }
}

/// One output table: a row of values per variable
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticTable {
    /// Statistic in the table
    pub statistic: Statistic,
    /// Output name (file stem)
    pub name: String,
    /// `(variable, per-time-step values)`, sorted by variable
    pub rows: Vec<(String, Vec<f64>)>,
}

/// Build every table for a finalized store
///
/// Full tracking yields mean, min, max, then quantiles ascending. Mean-only yields a single
/// table named `average`.
pub fn build_tables(store: &AggregationStateStore) -> Result<Vec<StatisticTable>, ReportError> {
    if !store.is_finalized() {
        return Err(ReportError::NotFinalized);
    }

    if store.mode() == TrackingMode::MeanOnly {
        return Ok(vec![StatisticTable {
            statistic: Statistic::Mean,
            name: "average".to_string(),
            rows: collect_rows(store, |s| Some(s.mean())),
        }]);
    }

    let mut tables = vec![
        table(Statistic::Mean, collect_rows(store, |s| Some(s.mean()))),
        table(Statistic::Min, collect_rows(store, |s| s.min())),
        table(Statistic::Max, collect_rows(store, |s| s.max())),
    ];
    for &target in store.targets() {
        tables.push(table(
            Statistic::Quantile(target),
            collect_rows(store, |s| s.quantile(target)),
        ));
    }
    Ok(tables)
}

fn table(statistic: Statistic, rows: Vec<(String, Vec<f64>)>) -> StatisticTable {
    StatisticTable {
        statistic,
        name: statistic.file_stem(),
        rows,
    }
}

fn collect_rows<F>(store: &AggregationStateStore, select: F) -> Vec<(String, Vec<f64>)>
where
    F: Fn(&mcsum_stats::VariableStats) -> Option<&[f64]>,
{
    store
        .iter()
        .filter_map(|(name, stats)| select(stats).map(|values| (name.to_string(), values.to_vec())))
        .collect()
}
