//! Output Formatting
//!
//! Short human-readable run summary printed after the tables are written.

use std::path::PathBuf;

use mcsum_stats::TrackingMode;

use crate::pipeline::Summary;

/// Format a run summary for terminal display
pub fn format_human_summary(summary: &Summary, written: &[PathBuf]) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("mcsum Summary\n");
    output.push_str(&"=".repeat(60));
    output.push('\n');

    let mode = match summary.store.mode() {
        TrackingMode::Full => {
            let levels: Vec<String> = summary
                .store
                .targets()
                .iter()
                .map(|t| t.label())
                .collect();
            format!("mean, min, max, {}", levels.join(", "))
        }
        TrackingMode::MeanOnly => "mean only".to_string(),
    };

    output.push_str(&format!("  statistics:   {}\n", mode));
    output.push_str(&format!("  scenarios:    {}\n", summary.scenario_count()));
    output.push_str(&format!("  variables:    {}\n", summary.store.len()));
    output.push_str(&format!("  time steps:   {}\n", summary.time_axis.len()));
    output.push_str(&format!(
        "  rows:         {} aggregated, {} skipped\n",
        summary.aggregated_rows, summary.skipped_rows
    ));

    if !written.is_empty() {
        output.push('\n');
        output.push_str("Wrote:\n");
        for path in written {
            output.push_str(&format!("  {}\n", path.display()));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{AggregateOptions, aggregate_reader};
    use mcsum_decode::DecoderConfig;
    use std::io::Cursor;

    #[test]
    fn test_summary_lines() {
        let input = "Time\t1\t2\n\
                     S1 NOISE SEED\t1\t1\nS1 X\t1\t2\n\
                     S2 NOISE SEED\t1\t1\nS2 X\t3\t4\n";
        let summary = aggregate_reader(
            Cursor::new(input),
            DecoderConfig::default(),
            AggregateOptions::default(),
        )
        .unwrap();

        let text = format_human_summary(&summary, &[PathBuf::from("out/mean.tab")]);
        assert!(text.contains("statistics:   mean, min, max, q25, q50, q75"));
        assert!(text.contains("scenarios:    2"));
        assert!(text.contains("variables:    1"));
        assert!(text.contains("time steps:   2"));
        assert!(text.contains("2 aggregated, 2 skipped"));
        assert!(text.contains("out/mean.tab"));
    }
}
