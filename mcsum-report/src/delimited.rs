//! Delimited Output
//!
//! Layout mirrors the input export:
//!
//! ```text
//! Time   2000  2001  2002
//! GDP    1.5   1.7   1.9
//! Pop    10    11    12
//! ```
//!
//! Values use Rust's shortest round-trip formatting, so reading a table back yields exactly the
//! in-memory values.

use std::io::Write;

use mcsum_decode::TimeAxis;

use crate::table::StatisticTable;

/// Write one table: a header row (`header_label` then the axis labels), then one row per variable
///
/// Fields containing the delimiter, a quote, or a line break are quoted, so subscripted names
/// such as `GDP[Region A,Sector 2]` survive a comma-delimited table.
pub fn write_delimited_table<W: Write>(
    writer: &mut W,
    header_label: &str,
    axis: &TimeAxis,
    table: &StatisticTable,
    delimiter: u8,
) -> std::io::Result<()> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    out.write_field(header_label)?;
    for label in &axis.labels {
        out.write_field(label)?;
    }
    out.write_record(None::<&[u8]>)?;

    for (variable, values) in &table.rows {
        out.write_field(variable)?;
        for value in values {
            out.write_field(value.to_string())?;
        }
        out.write_record(None::<&[u8]>)?;
    }

    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Statistic;

    fn sample_table() -> StatisticTable {
        StatisticTable {
            statistic: Statistic::Mean,
            name: "mean".to_string(),
            rows: vec![
                ("GDP".to_string(), vec![1.5, 30.0]),
                ("Pop".to_string(), vec![-0.1, 1e-7]),
            ],
        }
    }

    #[test]
    fn test_tab_layout() {
        let axis = TimeAxis::new(vec!["2000".to_string(), "2001".to_string()]);
        let mut out = Vec::new();
        write_delimited_table(&mut out, "Time", &axis, &sample_table(), b'\t').unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "Time\t2000\t2001\nGDP\t1.5\t30\nPop\t-0.1\t0.0000001\n");
    }

    #[test]
    fn test_values_round_trip() {
        let axis = TimeAxis::new(vec!["a".to_string(), "b".to_string()]);
        let table = StatisticTable {
            statistic: Statistic::Mean,
            name: "mean".to_string(),
            rows: vec![("x".to_string(), vec![0.1 + 0.2, 1.0 / 3.0])],
        };
        let mut out = Vec::new();
        write_delimited_table(&mut out, "Time", &axis, &table, b',').unwrap();

        let text = String::from_utf8(out).unwrap();
        let row = text.lines().nth(1).unwrap();
        let parsed: Vec<f64> = row
            .split(',')
            .skip(1)
            .map(|v| v.parse().unwrap())
            .collect();
        assert_eq!(parsed, table.rows[0].1);
    }

    #[test]
    fn test_empty_table_has_header_only() {
        let axis = TimeAxis::new(vec!["1".to_string()]);
        let table = StatisticTable {
            statistic: Statistic::Max,
            name: "max".to_string(),
            rows: Vec::new(),
        };
        let mut out = Vec::new();
        write_delimited_table(&mut out, "Time", &axis, &table, b'\t').unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Time\t1\n");
    }

    #[test]
    fn test_csv_quotes_subscripted_names() {
        let axis = TimeAxis::new(vec!["2000".to_string(), "2001".to_string()]);
        let table = StatisticTable {
            statistic: Statistic::Mean,
            name: "mean".to_string(),
            rows: vec![
                ("Total GDP[Region A,Sector 2]".to_string(), vec![1.0, 2.0]),
                ("Label \"quoted\"".to_string(), vec![3.0, 4.0]),
            ],
        };
        let mut out = Vec::new();
        write_delimited_table(&mut out, "Time", &axis, &table, b',').unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(out.as_slice());
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.len() == 3));
        assert_eq!(&records[1][0], "Total GDP[Region A,Sector 2]");
        assert_eq!(&records[1][1], "1");
        assert_eq!(&records[2][0], "Label \"quoted\"");
    }

    #[test]
    fn test_tab_leaves_commas_unquoted() {
        let axis = TimeAxis::new(vec!["1".to_string()]);
        let table = StatisticTable {
            statistic: Statistic::Min,
            name: "min".to_string(),
            rows: vec![("GDP[A,B]".to_string(), vec![0.5])],
        };
        let mut out = Vec::new();
        write_delimited_table(&mut out, "Time", &axis, &table, b'\t').unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Time\t1\nGDP[A,B]\t0.5\n");
    }
}
