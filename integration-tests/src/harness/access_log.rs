use chrono::{NaiveDate, NaiveDateTime};
use logwatch_core::generator::LogGenerator;
use logwatch_core::record::TIMESTAMP_FORMAT;
use std::path::Path;
use tempfile::TempDir;

pub fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2015, 5, 30)
        .unwrap()
        .and_hms_opt(14, 13, 9)
        .unwrap()
}

pub fn clf_line(
    ip: &str,
    method: &str,
    path: &str,
    status: &str,
    size: u64,
    at: NaiveDateTime,
) -> String {
    format!(
        "{ip} - - [{} +1000] \"{method} {path} HTTP/1.1\" {status} {size}\n",
        at.format(TIMESTAMP_FORMAT)
    )
}

pub fn sample_lines(at: NaiveDateTime) -> Vec<String> {
    vec![
        clf_line("127.0.0.1", "GET", "/icons/blank.gif", "200", 100, at),
        clf_line("289.8.42.1", "POST", "/index.html", "200", 1000, at),
        clf_line("127.0.0.1", "GET", "/icons/blank.gif", "200", 900, at),
        clf_line("289.8.42.1", "GET", "/css/display.css", "403", 4000, at),
        clf_line("127.0.0.1", "GET", "/index.php", "404", 1000, at),
        clf_line("289.8.42.1", "POST", "/icons/blank.gif", "200", 9000, at),
        clf_line("127.0.0.1", "GET", "/icons/blank.gif", "403", 4000, at),
    ]
}

/// Access log in a private temp directory, written through the generator.
pub struct AccessLog {
    _dir: TempDir,
    writer: LogGenerator,
}

impl AccessLog {
    /// The file itself is not created until something is written.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let writer = LogGenerator::new(dir.path().join("access.log"), 600.0).unwrap();
        Self { _dir: dir, writer }
    }

    pub fn path(&self) -> &Path {
        self.writer.path()
    }

    pub fn generator(&self) -> &LogGenerator {
        &self.writer
    }

    /// Appends raw text; lines must carry their own `\n`.
    pub fn append(&self, raw: &str) {
        self.writer.write(raw).unwrap();
    }

    pub fn append_all(&self, lines: &[String]) {
        for line in lines {
            self.append(line);
        }
    }
}

impl Default for AccessLog {
    fn default() -> Self {
        Self::new()
    }
}
