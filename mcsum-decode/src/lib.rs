#![warn(missing_docs)]
//! mcsum Record Decoder
//!
//! Turns rows of a Monte Carlo sensitivity export into typed records:
//! - Header rows (first field is the sentinel, `Time` by default) carry the time-axis labels
//! - Data rows carry a `S<scenario> <variable>` key followed by one value per time step
//!
//! Decoding is line-at-a-time over any `BufRead`, so the export is never held in memory.

mod error;
mod key;
mod reader;
mod record;

pub use error::DecodeError;
pub use key::{RecordKey, parse_record_key};
pub use reader::{NumberedRecord, RecordReader};
pub use record::{DecoderConfig, Record, TimeAxis, decode_line};

/// Header sentinel written by the simulation export
pub const DEFAULT_HEADER_SENTINEL: &str = "Time";

/// Field delimiter of the export
pub const DEFAULT_DELIMITER: char = '\t';

/// Variable used by the exporter to record random seeds; never aggregated
pub const NOISE_SEED_VARIABLE: &str = "NOISE SEED";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_HEADER_SENTINEL, "Time");
        assert_eq!(DEFAULT_DELIMITER, '\t');
        assert_eq!(NOISE_SEED_VARIABLE, "NOISE SEED");
    }
}
