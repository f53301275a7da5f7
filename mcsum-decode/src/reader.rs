//! Streaming Record Reader
//!
//! Reads one line at a time into a reused buffer; blank lines are skipped.

use std::io::BufRead;

use crate::error::DecodeError;
use crate::record::{DecoderConfig, Record, decode_line};

/// A record with the 1-based line it came from
#[derive(Debug, Clone, PartialEq)]
pub struct NumberedRecord {
    /// 1-based line number
    pub line: usize,
    /// Decoded record
    pub record: Record,
}

/// Iterator of decoded records over a buffered reader
pub struct RecordReader<R> {
    inner: R,
    config: DecoderConfig,
    line: usize,
    buf: String,
    done: bool,
}

impl<R: BufRead> RecordReader<R> {
    /// Reader with the default tab-delimited format
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, DecoderConfig::default())
    }

    /// Reader with an explicit format
    pub fn with_config(inner: R, config: DecoderConfig) -> Self {
        Self {
            inner,
            config,
            line: 0,
            buf: String::new(),
            done: false,
        }
    }

    /// Number of lines consumed so far
    pub fn lines_read(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<NumberedRecord, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.inner.read_line(&mut self.buf) {
                Ok(0) => {
                    self.done = true;
                }
                Ok(_) => {
                    self.line += 1;
                    match decode_line(&self.buf, &self.config) {
                        Ok(Some(record)) => {
                            return Some(Ok(NumberedRecord {
                                line: self.line,
                                record,
                            }));
                        }
                        Ok(None) => continue,
                        Err(e) => {
                            // Errors are fatal; stop after reporting
                            self.done = true;
                            return Some(Err(e.at_line(self.line)));
                        }
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(DecodeError::from(e).at_line(self.line + 1)));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const EXPORT: &str = "Time\t1\t2\nS1 A\t1\t2\n\nS1 NOISE SEED\t7\t7\nS2 A\t3\t4\n";

    #[test]
    fn test_reads_all_records_with_line_numbers() {
        let records: Vec<_> = RecordReader::new(Cursor::new(EXPORT))
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(records.len(), 4);
        assert!(matches!(records[0].record, Record::Header(_)));
        let lines: Vec<_> = records.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_error_carries_line_and_stops() {
        let input = "Time\t1\nS1 A\t1\nbogus\t1\nS2 A\t2\n";
        let mut reader = RecordReader::new(Cursor::new(input));

        assert!(reader.next().unwrap().is_ok());
        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(err, DecodeError::AtLine { line: 3, .. }));
        assert!(matches!(err.root(), DecodeError::MalformedRecordKey { .. }));
        assert!(reader.next().is_none());
        assert_eq!(reader.lines_read(), 3);
    }

    #[test]
    fn test_missing_final_newline() {
        let records: Vec<_> = RecordReader::new(Cursor::new("S1 A\t5"))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_error_message_includes_line() {
        let err = RecordReader::new(Cursor::new("S1 A\tx"))
            .next()
            .unwrap()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 1: Invalid value 'x' for 'S1 A' in column 1"
        );
    }
}
