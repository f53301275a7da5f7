//! Report Files

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use mcsum_decode::TimeAxis;
use tracing::info;

use crate::OutputFormat;
use crate::delimited::write_delimited_table;
use crate::error::ReportError;
use crate::json::{ReportMeta, generate_json_report};
use crate::table::StatisticTable;

/// Write all tables into `dir` (created if missing) and return the written paths
///
/// Delimited formats write one `<name>.<ext>` file per table; JSON writes `summary.json`.
pub fn write_report(
    dir: &Path,
    format: OutputFormat,
    header_label: &str,
    axis: &TimeAxis,
    tables: &[StatisticTable],
    meta: ReportMeta,
) -> Result<Vec<PathBuf>, ReportError> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let Some(delimiter) = format.delimiter() else {
        let path = dir.join(format!("summary.{}", format.extension()));
        let json = generate_json_report(meta, axis, tables)?;
        std::fs::write(&path, json + "\n").map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "wrote JSON report");
        return Ok(vec![path]);
    };

    let mut written = Vec::with_capacity(tables.len());
    for table in tables {
        let path = dir.join(format!("{}.{}", table.name, format.extension()));
        let io_err = |source| ReportError::Io {
            path: path.clone(),
            source,
        };

        let file = File::create(&path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        write_delimited_table(&mut writer, header_label, axis, table, delimiter).map_err(io_err)?;
        writer.flush().map_err(io_err)?;

        info!(path = %path.display(), rows = table.rows.len(), "wrote {} table", table.statistic);
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::{ReportDocument, SCHEMA_VERSION};
    use crate::table::Statistic;

    fn meta() -> ReportMeta {
        ReportMeta {
            schema_version: SCHEMA_VERSION,
            version: "test".to_string(),
            generated_at: chrono::Utc::now(),
            input: None,
            scenario_count: 2,
            variable_count: 1,
            skipped_rows: 0,
            last_step_corrected: true,
            clamped_to_range: true,
        }
    }

    fn tables() -> Vec<StatisticTable> {
        vec![
            StatisticTable {
                statistic: Statistic::Mean,
                name: "mean".to_string(),
                rows: vec![("X".to_string(), vec![1.5])],
            },
            StatisticTable {
                statistic: Statistic::Min,
                name: "min".to_string(),
                rows: vec![("X".to_string(), vec![1.0])],
            },
        ]
    }

    #[test]
    fn test_writes_one_file_per_table() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let axis = TimeAxis::new(vec!["2000".to_string()]);

        let paths =
            write_report(&out, OutputFormat::Tab, "Time", &axis, &tables(), meta()).unwrap();

        assert_eq!(paths, vec![out.join("mean.tab"), out.join("min.tab")]);
        let mean = std::fs::read_to_string(out.join("mean.tab")).unwrap();
        assert_eq!(mean, "Time\t2000\nX\t1.5\n");
    }

    #[test]
    fn test_csv_extension_and_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let axis = TimeAxis::new(vec!["1".to_string(), "2".to_string()]);
        let tables = vec![StatisticTable {
            statistic: Statistic::Max,
            name: "max".to_string(),
            rows: vec![("Y".to_string(), vec![3.0, 4.0])],
        }];

        write_report(dir.path(), OutputFormat::Csv, "Time", &axis, &tables, meta()).unwrap();
        let max = std::fs::read_to_string(dir.path().join("max.csv")).unwrap();
        assert_eq!(max, "Time,1,2\nY,3,4\n");
    }

    #[test]
    fn test_json_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let axis = TimeAxis::new(vec!["2000".to_string()]);

        let paths =
            write_report(dir.path(), OutputFormat::Json, "Time", &axis, &tables(), meta()).unwrap();

        assert_eq!(paths, vec![dir.path().join("summary.json")]);
        let doc: ReportDocument =
            serde_json::from_str(&std::fs::read_to_string(&paths[0]).unwrap()).unwrap();
        assert_eq!(doc.tables.len(), 2);
    }
}
