use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration file. Both blocks are optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogwatchConfig {
    #[serde(default)]
    pub monitor: MonitorConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// Access log to follow.
    pub log_path: PathBuf,

    /// Seconds between polls.
    pub refresh_period: f64,

    /// Hits per minute above which the alert is raised.
    pub alert_threshold: f64,

    /// Length of the trailing window, in seconds.
    pub monitor_duration: f64,

    /// Alert history file.
    pub alert_log: PathBuf,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("access.log"),
            refresh_period: 10.0,
            alert_threshold: 10.0,
            monitor_duration: 120.0,
            alert_log: PathBuf::from("alerts.log"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub log_path: PathBuf,

    /// Lines per minute, on average.
    pub rate: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("access.log"),
            rate: 600.0,
        }
    }
}
