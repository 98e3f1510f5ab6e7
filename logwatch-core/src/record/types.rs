use crate::record::ParseError;
use chrono::NaiveDateTime;
use serde::Serialize;

/// One well-formed observation extracted from an access log line.
///
/// Records are created by the parser and never mutated afterwards; the
/// monitor only appends and evicts them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub source_ip: String,
    /// RFC 1413 identity field, kept opaque.
    pub identity: String,
    /// Authenticated user field, kept opaque.
    pub user: String,
    /// Second precision, offset discarded.
    pub timestamp: NaiveDateTime,
    pub method: String,
    pub path: String,
    /// Traffic bucket derived from `path`.
    pub section: String,
    pub protocol: String,
    /// Categorical label, so kept as text.
    pub status_code: String,
    pub response_size: u64,
}

/// Result of parsing one raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    WellFormed(LogRecord),
    Malformed(ParseError),
}

impl ParsedLine {
    pub fn is_well_formed(&self) -> bool {
        matches!(self, ParsedLine::WellFormed(_))
    }

    pub fn record(&self) -> Option<&LogRecord> {
        match self {
            ParsedLine::WellFormed(record) => Some(record),
            ParsedLine::Malformed(_) => None,
        }
    }

    pub fn into_record(self) -> Option<LogRecord> {
        match self {
            ParsedLine::WellFormed(record) => Some(record),
            ParsedLine::Malformed(_) => None,
        }
    }
}

impl From<Result<LogRecord, ParseError>> for ParsedLine {
    fn from(result: Result<LogRecord, ParseError>) -> Self {
        match result {
            Ok(record) => ParsedLine::WellFormed(record),
            Err(err) => ParsedLine::Malformed(err),
        }
    }
}
