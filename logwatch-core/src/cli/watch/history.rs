use crate::cli::watch::constants::HISTORY_CAPACITY;
use crate::monitor::AlertTransition;
use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Alert messages, newest first, mirrored to an append-only file.
#[derive(Debug)]
pub struct AlertHistory {
    path: PathBuf,
    recent: VecDeque<String>,
}

impl AlertHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            recent: VecDeque::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keeps the message for display and appends it to the file.
    ///
    /// The in-memory entry is kept even when the file write fails.
    pub fn record(&mut self, transition: &AlertTransition) -> io::Result<()> {
        let message = transition.to_string();

        self.recent.push_front(message.clone());
        self.recent.truncate(HISTORY_CAPACITY);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{message}")
    }

    pub fn recent(&self) -> impl Iterator<Item = &str> {
        self.recent.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }
}
