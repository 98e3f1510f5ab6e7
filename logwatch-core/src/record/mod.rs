//! Access log records.
//!
//! Turns one raw Common Log Format line into a [`LogRecord`], or into a
//! [`ParsedLine::Malformed`] carrying the reason it was rejected. Malformed
//! input is an expected condition here, so parsing never returns `Err` to
//! the ingestion path.

mod error;
mod parse;
mod section;
mod types;

pub use error::ParseError;
pub use parse::{TIMESTAMP_FORMAT, parse_line};
pub use section::{ROOT_SECTION, derive_section};
pub use types::{LogRecord, ParsedLine};
