use thiserror::Error;

/// Why a log line could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty line")]
    Empty,

    #[error("missing field: {field}")]
    MissingField { field: &'static str },

    #[error("unterminated '[' in timestamp field")]
    UnterminatedTimestamp,

    #[error("unterminated quote in request field")]
    UnterminatedQuote,

    #[error("invalid request line '{request}'")]
    InvalidRequest { request: String },

    #[error("invalid timestamp '{value}'")]
    InvalidTimestamp { value: String },

    #[error("invalid response size '{value}'")]
    InvalidSize { value: String },

    #[error("unexpected trailing data '{rest}'")]
    TrailingData { rest: String },
}
