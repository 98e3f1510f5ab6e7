use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// An append-only, line-oriented log.
///
/// `marker` is the number of lines the caller has already consumed; the
/// source returns every complete line after it, in order.
pub trait LogSource: Send {
    fn read_lines_after(&mut self, marker: usize) -> io::Result<Vec<String>>;
}

impl<S: LogSource + ?Sized> LogSource for Box<S> {
    fn read_lines_after(&mut self, marker: usize) -> io::Result<Vec<String>> {
        (**self).read_lines_after(marker)
    }
}

//-----------------------------------------------------------------------------
// File-backed source
//-----------------------------------------------------------------------------

/// Reads a growing access log from disk.
///
/// Only `\n`-terminated lines are returned; a line the writer is still in
/// the middle of appending is picked up on a later call. The byte offset of
/// the last returned line is remembered so steady-state polls only read the
/// newly appended suffix.
#[derive(Debug)]
pub struct FileLogSource {
    path: PathBuf,
    lines_seen: usize,
    offset: u64,
}

impl FileLogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lines_seen: 0,
            offset: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSource for FileLogSource {
    fn read_lines_after(&mut self, marker: usize) -> io::Result<Vec<String>> {
        // Position not tracked by us: rescan from the start.
        if marker != self.lines_seen {
            self.lines_seen = 0;
            self.offset = 0;
        }

        let mut file = File::open(&self.path)?;
        let len = file.metadata()?.len();

        if len < self.offset {
            tracing::warn!(
                path = %self.path.display(),
                len,
                offset = self.offset,
                "log source shrank; truncation and rotation are not supported"
            );
            return Ok(Vec::new());
        }

        file.seek(SeekFrom::Start(self.offset))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;

        let complete = buf
            .iter()
            .rposition(|b| *b == b'\n')
            .map_or(0, |i| i + 1);

        let mut skip = marker.saturating_sub(self.lines_seen);
        let mut seen = 0;
        let mut lines = Vec::new();

        for raw in buf[..complete].split_inclusive(|b| *b == b'\n') {
            seen += 1;
            if skip > 0 {
                skip -= 1;
                continue;
            }
            let text = String::from_utf8_lossy(raw);
            lines.push(text.trim_end_matches(['\n', '\r']).to_string());
        }

        self.offset += complete as u64;
        self.lines_seen += seen;

        Ok(lines)
    }
}

//-----------------------------------------------------------------------------
// In-memory source
//-----------------------------------------------------------------------------

/// Shared in-memory log, handy for driving a monitor without a file.
///
/// Clones share the same lines, so one clone can be handed to a monitor
/// while another keeps appending.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogSource {
    inner: Arc<Mutex<MemoryLog>>,
}

#[derive(Debug, Default)]
struct MemoryLog {
    lines: Vec<String>,
    unavailable: bool,
}

impl MemoryLogSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&self, line: impl Into<String>) {
        self.lock().lines.push(line.into());
    }

    pub fn extend<I, L>(&self, lines: I)
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        self.lock().lines.extend(lines.into_iter().map(Into::into));
    }

    /// While set, reads fail as if the underlying file were missing.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    pub fn len(&self) -> usize {
        self.lock().lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().lines.is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryLog> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSource for MemoryLogSource {
    fn read_lines_after(&mut self, marker: usize) -> io::Result<Vec<String>> {
        let log = self.lock();
        if log.unavailable {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "in-memory log marked unavailable",
            ));
        }

        Ok(log.lines.iter().skip(marker).cloned().collect())
    }
}
