//! Record Key Parsing
//!
//! Data rows are keyed `S<scenario> <variable>`, e.g. `S12 Population[Region A]`.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::DecodeError;

static KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^S([0-9]+) (.+)$").expect("record key pattern is valid"));

/// Scenario and variable decoded from a row key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    /// 1-based scenario number
    pub scenario: u64,
    /// Variable name, verbatim
    pub variable: String,
}

/// Split a row key into scenario number and variable name
pub fn parse_record_key(field: &str) -> Result<RecordKey, DecodeError> {
    let malformed = || DecodeError::MalformedRecordKey {
        key: field.to_string(),
    };

    let caps = KEY_PATTERN.captures(field).ok_or_else(malformed)?;
    let scenario = caps[1].parse::<u64>().map_err(|_| malformed())?;

    Ok(RecordKey {
        scenario,
        variable: caps[2].to_string(),
    })
}
