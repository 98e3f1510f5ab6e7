//! `logwatch watch`: follow an access log and report on it.
//!
//! The monitor runs as its own background task. This command only reads
//! snapshots from it once per refresh period and records every alert
//! transition it broadcasts:
//!
//! TrafficMonitor (background task)
//! WindowSnapshot / AlertTransition
//! render_dashboard | JSON line
//! AlertHistory (alerts.log)

mod constants;
mod history;
mod render;
#[cfg(test)]
mod tests;

pub use history::AlertHistory;
pub use render::{redraw, render_dashboard, summary_line};

use crate::cli::watch::constants::{HIDE_CURSOR, SHOW_CURSOR};
use crate::conf::{MonitorConfig, load_or_default};
use crate::logging::{LogMode, default_log_mode};
use crate::monitor::{FileLogSource, MonitorParams, TrafficMonitor, WindowSnapshot};
use anyhow::{Context, Result};
use clap::Args;
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    /// Path to the HCL config file (defaults to ./logwatch.hcl when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Access log to follow
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Seconds between polls
    #[arg(long)]
    pub refresh: Option<f64>,

    /// Hits per minute above which the alert is raised
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Length of the trailing window, in seconds
    #[arg(long)]
    pub duration: Option<f64>,

    /// Alert history file
    #[arg(long)]
    pub alerts: Option<PathBuf>,

    /// Print one JSON snapshot per line instead of the dashboard
    #[arg(long)]
    pub json: bool,

    /// Directory for the daily log file written in dashboard mode
    #[arg(long, default_value = DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,
}

const DEFAULT_LOG_DIR: &str = "logs";

impl Default for WatchArgs {
    fn default() -> Self {
        Self {
            config: None,
            log: None,
            refresh: None,
            threshold: None,
            duration: None,
            alerts: None,
            json: false,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl WatchArgs {
    pub fn mode(&self) -> LogMode {
        if self.json {
            LogMode::Json
        } else {
            default_log_mode()
        }
    }

    /// Applies command-line overrides on top of the file settings.
    pub fn resolve(&self, file: &MonitorConfig) -> MonitorConfig {
        let mut cfg = file.clone();
        if let Some(log) = &self.log {
            cfg.log_path = log.clone();
        }
        if let Some(refresh) = self.refresh {
            cfg.refresh_period = refresh;
        }
        if let Some(threshold) = self.threshold {
            cfg.alert_threshold = threshold;
        }
        if let Some(duration) = self.duration {
            cfg.monitor_duration = duration;
        }
        if let Some(alerts) = &self.alerts {
            cfg.alert_log = alerts.clone();
        }
        cfg
    }
}

pub async fn run_watch(args: WatchArgs) -> Result<()> {
    let file = load_or_default(args.config.as_deref()).context("failed to load configuration")?;
    let cfg = args.resolve(&file.monitor);
    let params = cfg.to_params().context("invalid monitor settings")?;
    let mode = args.mode();

    info!(
        log_path = %cfg.log_path.display(),
        alert_log = %cfg.alert_log.display(),
        ?mode,
        "watching access log"
    );

    let monitor = TrafficMonitor::with_system_clock(params, FileLogSource::new(&cfg.log_path));
    let mut alerts = monitor.subscribe();
    let handle = monitor.start();
    let mut history = AlertHistory::new(&cfg.alert_log);

    let mut render_tick = interval(params.refresh_period);
    render_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    if mode == LogMode::Dashboard {
        print!("{HIDE_CURSOR}");
        let _ = io::stdout().flush();
    }

    let result = loop {
        tokio::select! {
            signal = &mut ctrl_c => {
                if let Err(err) = signal {
                    warn!(error = %err, "failed to listen for ctrl-c");
                }
                break Ok(());
            }
            received = alerts.recv() => match received {
                Ok(transition) => {
                    if let Err(err) = history.record(&transition) {
                        warn!(
                            path = %history.path().display(),
                            error = %err,
                            "cannot write to the alert log"
                        );
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "alert history fell behind; transitions dropped");
                }
                Err(RecvError::Closed) => break Ok(()),
            },
            _ = render_tick.tick() => {
                if let Err(err) = present(mode, &handle.snapshot(), &params, &history) {
                    break Err(err);
                }
            }
        }
    };

    handle.shutdown().await;

    if mode == LogMode::Dashboard {
        print!("{SHOW_CURSOR}");
        let _ = io::stdout().flush();
    }

    result
}

fn present(
    mode: LogMode,
    snapshot: &WindowSnapshot,
    params: &MonitorParams,
    history: &AlertHistory,
) -> Result<()> {
    match mode {
        LogMode::Json => {
            let line = serde_json::to_string(snapshot)?;
            println!("{line}");
        }
        LogMode::Dashboard => redraw(&render_dashboard(snapshot, params, history, true)),
    }
    Ok(())
}
