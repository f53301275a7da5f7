//! Row Decoding

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::key::{RecordKey, parse_record_key};
use crate::{DEFAULT_DELIMITER, DEFAULT_HEADER_SENTINEL};

/// Time-axis labels from the header row (sentinel field excluded)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeAxis {
    /// Ordered labels, one per time step
    pub labels: Vec<String>,
}

impl TimeAxis {
    /// Build an axis from labels
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Number of time steps `T`
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the axis has no labels
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// One decoded row
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// Header row giving the time axis
    Header(TimeAxis),
    /// One scenario's values for one variable
    Data {
        /// Scenario and variable
        key: RecordKey,
        /// One value per time step
        values: Vec<f64>,
    },
}

/// Row format settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Field delimiter
    pub delimiter: char,
    /// First field of the header row
    pub header_sentinel: String,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            header_sentinel: DEFAULT_HEADER_SENTINEL.to_string(),
        }
    }
}

/// Decode one line of the export
///
/// Trailing whitespace is stripped first (which also drops trailing empty fields). Blank lines
/// yield `Ok(None)`. Values must be finite: `NaN` and infinities are rejected, since they would
/// poison every running statistic of their time step.
pub fn decode_line(line: &str, config: &DecoderConfig) -> Result<Option<Record>, DecodeError> {
    let line = line.trim_end();
    if line.is_empty() {
        return Ok(None);
    }

    let mut fields = line.split(config.delimiter);
    let first = fields.next().unwrap_or_default();

    if first == config.header_sentinel {
        let labels = fields.map(str::to_string).collect();
        return Ok(Some(Record::Header(TimeAxis::new(labels))));
    }

    let key = parse_record_key(first)?;
    let values = fields
        .enumerate()
        .map(|(i, raw)| {
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| DecodeError::InvalidValue {
                    key: first.to_string(),
                    column: i + 1,
                    value: raw.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(Record::Data { key, values }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(line: &str) -> Result<Option<Record>, DecodeError> {
        decode_line(line, &DecoderConfig::default())
    }

    #[test]
    fn test_header_row() {
        let record = decode("Time\t2000\t2001\t2002\n").unwrap().unwrap();
        assert_eq!(
            record,
            Record::Header(TimeAxis::new(vec![
                "2000".to_string(),
                "2001".to_string(),
                "2002".to_string()
            ]))
        );
    }

    #[test]
    fn test_data_row() {
        let record = decode("S3 GDP\t1.5\t-2\t3e2\r\n").unwrap().unwrap();
        match record {
            Record::Data { key, values } => {
                assert_eq!(key.scenario, 3);
                assert_eq!(key.variable, "GDP");
                assert_eq!(values, vec![1.5, -2.0, 300.0]);
            }
            other => panic!("expected data row, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_tabs_dropped() {
        let record = decode("S1 X\t1\t2\t\t\n").unwrap().unwrap();
        assert!(matches!(record, Record::Data { values, .. } if values.len() == 2));
    }

    #[test]
    fn test_blank_line() {
        assert!(decode("").unwrap().is_none());
        assert!(decode("  \t \n").unwrap().is_none());
    }

    #[test]
    fn test_invalid_value() {
        let err = decode("S1 X\t1\tabc\t3").unwrap_err();
        match err {
            DecodeError::InvalidValue { key, column, value } => {
                assert_eq!(key, "S1 X");
                assert_eq!(column, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_empty_middle_field_is_invalid() {
        assert!(matches!(
            decode("S1 X\t1\t\t3"),
            Err(DecodeError::InvalidValue { column: 2, .. })
        ));
    }

    #[test]
    fn test_non_finite_values_are_invalid() {
        for (line, column) in [
            ("S1 X\t1\tNaN", 2),
            ("S1 X\tinf\t1", 1),
            ("S1 X\t1\t2\t-infinity", 3),
            ("S1 X\t1e999", 1),
        ] {
            match decode(line) {
                Err(DecodeError::InvalidValue { column: c, .. }) => {
                    assert_eq!(c, column, "{}", line)
                }
                other => panic!("{}: unexpected {:?}", line, other),
            }
        }
    }

    #[test]
    fn test_malformed_key() {
        assert!(matches!(
            decode("Scenario one\t1"),
            Err(DecodeError::MalformedRecordKey { .. })
        ));
    }

    #[test]
    fn test_custom_delimiter_and_sentinel() {
        let config = DecoderConfig {
            delimiter: ',',
            header_sentinel: "Year".to_string(),
        };
        let header = decode_line("Year,1,2", &config).unwrap().unwrap();
        assert!(matches!(header, Record::Header(axis) if axis.len() == 2));

        let data = decode_line("S2 Y,4,5", &config).unwrap().unwrap();
        assert!(matches!(data, Record::Data { values, .. } if values == vec![4.0, 5.0]));
    }
}
