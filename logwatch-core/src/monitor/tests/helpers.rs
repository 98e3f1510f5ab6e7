use crate::record::{LogRecord, TIMESTAMP_FORMAT, parse_line};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

//-----------------------------------------------------------------------------
// Test helpers
//-----------------------------------------------------------------------------

pub fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2015, 5, 30)
        .unwrap()
        .and_hms_opt(14, 13, 9)
        .unwrap()
}

pub fn secs(n: i64) -> TimeDelta {
    TimeDelta::seconds(n)
}

pub fn line(
    ip: &str,
    method: &str,
    path: &str,
    status: &str,
    size: u64,
    at: NaiveDateTime,
) -> String {
    format!(
        "{ip} - - [{} +1000] \"{method} {path} HTTP/1.1\" {status} {size}",
        at.format(TIMESTAMP_FORMAT)
    )
}

pub fn record(
    ip: &str,
    method: &str,
    path: &str,
    status: &str,
    size: u64,
    at: NaiveDateTime,
) -> LogRecord {
    parse_line(&line(ip, method, path, status, size, at))
        .into_record()
        .unwrap()
}

pub fn hit_at(at: NaiveDateTime) -> LogRecord {
    record("127.0.0.1", "GET", "/icons/blank.gif", "200", 100, at)
}

/// The seven-line sample used across the summary tests.
pub fn sample_lines(at: NaiveDateTime) -> Vec<String> {
    vec![
        line("127.0.0.1", "GET", "/icons/blank.gif", "200", 100, at),
        line("289.8.42.1", "POST", "/index.html", "200", 1000, at),
        line("127.0.0.1", "GET", "/icons/blank.gif", "200", 900, at),
        line("289.8.42.1", "GET", "/css/display.css", "403", 4000, at),
        line("127.0.0.1", "GET", "/index.php", "404", 1000, at),
        line("289.8.42.1", "POST", "/icons/blank.gif", "200", 9000, at),
        line("127.0.0.1", "GET", "/icons/blank.gif", "403", 4000, at),
    ]
}
