use crate::generator::pools::{
    IDENTITIES, KNOWN_IPS, MAX_SIZE, METHODS, MIN_SIZE, SECTIONS, STATUS_CODES,
};
use crate::monitor::{Clock, SystemClock};
use crate::record::TIMESTAMP_FORMAT;
use chrono::NaiveDateTime;
use rand::seq::IndexedRandom;
use rand::{Rng, rng};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("generation rate must be a positive number of lines per minute, got {rate}")]
    InvalidRate { rate: f64 },
}

/// Writes random access-log lines to a file.
#[derive(Debug, Clone)]
pub struct LogGenerator {
    path: PathBuf,
    rate_per_minute: f64,
}

impl LogGenerator {
    pub fn new(path: impl Into<PathBuf>, rate_per_minute: f64) -> Result<Self, GeneratorError> {
        if !rate_per_minute.is_finite() || rate_per_minute <= 0.0 {
            return Err(GeneratorError::InvalidRate {
                rate: rate_per_minute,
            });
        }

        Ok(Self {
            path: path.into(),
            rate_per_minute,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rate_per_minute(&self) -> f64 {
        self.rate_per_minute
    }

    /// Builds one random, newline-terminated log line stamped with `at`.
    pub fn generate_entry(&self, at: NaiveDateTime) -> String {
        let mut rng = rng();

        let ip = if rng.random_bool(0.5) {
            pick(&mut rng, KNOWN_IPS).to_string()
        } else {
            random_ip(&mut rng)
        };

        let mut path = pick(&mut rng, SECTIONS).to_string();
        if rng.random_bool(0.5) {
            path.push_str(pick(&mut rng, SECTIONS));
        }
        path.push_str(".html");

        format!(
            "{ip} {identity} [{ts} +1000] \"{method} {path} HTTP/1.1\" {status} {size}\n",
            identity = pick(&mut rng, IDENTITIES),
            ts = at.format(TIMESTAMP_FORMAT),
            method = pick(&mut rng, METHODS),
            status = pick(&mut rng, STATUS_CODES),
            size = rng.random_range(MIN_SIZE..=MAX_SIZE),
        )
    }

    pub fn write_entry(&self, at: NaiveDateTime) -> io::Result<()> {
        let entry = self.generate_entry(at);
        self.write(&entry)
    }

    /// Appends `raw` verbatim; the caller supplies any trailing newline.
    pub fn write(&self, raw: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(raw.as_bytes())
    }

    /// Truncates the log to zero length, creating it if needed.
    pub fn clear(&self) -> io::Result<()> {
        File::create(&self.path).map(drop)
    }

    /// Random pause averaging `60 / rate` seconds.
    fn next_delay(&self) -> Duration {
        let mean = 60.0 / self.rate_per_minute;
        let secs = rng().random::<f64>() * 2.0 * mean;
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Spawns the writer loop on the current tokio runtime.
    pub fn start(self) -> GeneratorHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        let join_handle = tokio::spawn(self.run(shutdown_rx));

        GeneratorHandle {
            shutdown_tx,
            join_handle,
        }
    }

    async fn run(self, mut shutdown_rx: mpsc::Receiver<()>) {
        info!(
            path = %self.path.display(),
            rate_per_minute = self.rate_per_minute,
            "log generator started"
        );

        let clock = SystemClock;
        let mut written: u64 = 0;

        loop {
            match self.write_entry(clock.now()) {
                Ok(()) => written += 1,
                Err(err) => warn!(
                    path = %self.path.display(),
                    error = %err,
                    "cannot write to the log file"
                ),
            }

            let delay = self.next_delay();
            debug!(delay_ms = delay.as_millis() as u64, "generator sleeping");

            tokio::select! {
                _ = shutdown_rx.recv() => break,
                _ = sleep(delay) => {}
            }
        }

        info!(written, "log generator stopped");
    }
}

/// Handle for a running generator loop.
pub struct GeneratorHandle {
    shutdown_tx: mpsc::Sender<()>,
    join_handle: JoinHandle<()>,
}

impl GeneratorHandle {
    pub fn is_finished(&self) -> bool {
        self.join_handle.is_finished()
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(err) = self.join_handle.await {
            warn!(error = %err, "log generator task ended abnormally");
        }
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, pool: &'a [&'a str]) -> &'a str {
    // Pools are non-empty constants.
    pool.choose(rng).copied().unwrap_or_default()
}

fn random_ip<R: Rng + ?Sized>(rng: &mut R) -> String {
    let [a, b, c, d]: [u8; 4] = rng.random();
    format!("{a}.{b}.{c}.{d}")
}
