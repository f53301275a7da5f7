//! Decoder errors

use thiserror::Error;

/// Errors that can occur while decoding the export
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Reading the input failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The first field does not match `S<scenario> <variable>`
    #[error("Malformed record key '{key}': expected 'S<scenario> <variable>'")]
    MalformedRecordKey {
        /// Offending first field
        key: String,
    },

    /// A value field is not a finite number
    #[error("Invalid value '{value}' for '{key}' in column {column}")]
    InvalidValue {
        /// Record key of the row
        key: String,
        /// 1-based value column
        column: usize,
        /// Field as read
        value: String,
    },

    /// An error with its 1-based input line
    #[error("line {line}: {source}")]
    AtLine {
        /// Line number
        line: usize,
        /// Underlying error
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Attach a 1-based line number
    pub fn at_line(self, line: usize) -> Self {
        match self {
            already @ DecodeError::AtLine { .. } => already,
            other => DecodeError::AtLine {
                line,
                source: Box::new(other),
            },
        }
    }

    /// The error without line information
    pub fn root(&self) -> &DecodeError {
        match self {
            DecodeError::AtLine { source, .. } => source.root(),
            other => other,
        }
    }
}
