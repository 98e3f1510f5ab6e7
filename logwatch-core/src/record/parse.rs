use crate::record::{LogRecord, ParseError, ParsedLine, derive_section};
use chrono::NaiveDateTime;

/// Layout of the timestamp inside the `[...]` field, without the offset.
pub const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S";

/// Parses one Common Log Format line.
///
/// Expected shape:
///
/// ```text
/// 127.0.0.1 user-identifier frank [10/Oct/2000:13:55:36 -0700] "GET /apache_pb.gif HTTP/1.0" 200 2326
/// ```
///
/// The authenticated-user field may be omitted, and the offset token after
/// the timestamp is accepted but never applied: all timestamps are compared
/// as written. A size of `-` means no body and counts as zero. Quoted
/// Combined Log Format fields after the size are ignored.
pub fn parse_line(line: &str) -> ParsedLine {
    parse_record(line).into()
}

fn parse_record(line: &str) -> Result<LogRecord, ParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    //-------------------------------------------------------------------------
    // Client fields: everything before the timestamp bracket
    //-------------------------------------------------------------------------
    let open = line.find('[').ok_or(ParseError::MissingField {
        field: "timestamp",
    })?;

    let mut client = line[..open].split_whitespace();
    let source_ip = client.next().ok_or(ParseError::MissingField {
        field: "source_ip",
    })?;
    let identity = client.next().ok_or(ParseError::MissingField {
        field: "identity",
    })?;
    let user = client.collect::<Vec<_>>().join(" ");
    let user = if user.is_empty() { "-".to_string() } else { user };

    //-------------------------------------------------------------------------
    // Timestamp
    //-------------------------------------------------------------------------
    let after_open = &line[open + 1..];
    let close = after_open
        .find(']')
        .ok_or(ParseError::UnterminatedTimestamp)?;

    let raw_timestamp = after_open[..close]
        .split_whitespace()
        .next()
        .ok_or(ParseError::MissingField {
            field: "timestamp",
        })?;

    let timestamp = NaiveDateTime::parse_from_str(raw_timestamp, TIMESTAMP_FORMAT).map_err(
        |_| ParseError::InvalidTimestamp {
            value: raw_timestamp.to_string(),
        },
    )?;

    //-------------------------------------------------------------------------
    // Request line
    //-------------------------------------------------------------------------
    let rest = after_open[close + 1..].trim_start();
    let rest = rest.strip_prefix('"').ok_or(ParseError::MissingField {
        field: "request",
    })?;
    let end_quote = rest.find('"').ok_or(ParseError::UnterminatedQuote)?;
    let request = &rest[..end_quote];

    let mut parts = request.split_whitespace();
    let (Some(method), Some(path), Some(protocol), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::InvalidRequest {
            request: request.to_string(),
        });
    };

    //-------------------------------------------------------------------------
    // Status and size
    //-------------------------------------------------------------------------
    let tail = &rest[end_quote + 1..];
    let (status_code, tail) = split_token(tail).ok_or(ParseError::MissingField { field: "status" })?;
    let (raw_size, tail) = split_token(tail).ok_or(ParseError::MissingField { field: "size" })?;

    // Combined Log Format appends quoted referer and user agent fields.
    let tail = tail.trim();
    if !tail.is_empty() && !tail.starts_with('"') {
        return Err(ParseError::TrailingData {
            rest: tail.to_string(),
        });
    }

    let response_size = match raw_size {
        "-" => 0,
        value => value.parse::<u64>().map_err(|_| ParseError::InvalidSize {
            value: value.to_string(),
        })?,
    };

    Ok(LogRecord {
        source_ip: source_ip.to_string(),
        identity: identity.to_string(),
        user,
        timestamp,
        method: method.to_string(),
        path: path.to_string(),
        section: derive_section(path),
        protocol: protocol.to_string(),
        status_code: status_code.to_string(),
        response_size,
    })
}

fn split_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }

    Some(s.split_once(char::is_whitespace).unwrap_or((s, "")))
}
