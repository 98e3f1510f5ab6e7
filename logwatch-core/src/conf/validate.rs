use crate::conf::{ConfigError, GeneratorConfig, LogwatchConfig, MonitorConfig};
use crate::monitor::MonitorParams;
use serde::Serialize;
use std::fmt;

/// One rejected setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Dotted path, e.g. `monitor.refresh_period`.
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl LogwatchConfig {
    /// Checks every setting and reports all violations at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut violations = Vec::new();
        self.monitor.collect_violations(&mut violations);
        self.generator.collect_violations(&mut violations);

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid { violations })
        }
    }
}

impl MonitorConfig {
    fn collect_violations(&self, out: &mut Vec<Violation>) {
        positive(out, "monitor.refresh_period", self.refresh_period);
        positive(out, "monitor.alert_threshold", self.alert_threshold);
        positive(out, "monitor.monitor_duration", self.monitor_duration);
        non_empty_path(out, "monitor.log_path", self.log_path.as_os_str().is_empty());
        non_empty_path(out, "monitor.alert_log", self.alert_log.as_os_str().is_empty());
    }

    /// Converts to runtime params, revalidating along the way.
    pub fn to_params(&self) -> Result<MonitorParams, ConfigError> {
        let mut violations = Vec::new();
        self.collect_violations(&mut violations);
        if !violations.is_empty() {
            return Err(ConfigError::Invalid { violations });
        }

        MonitorParams::from_secs(
            self.refresh_period,
            self.alert_threshold,
            self.monitor_duration,
        )
        .map_err(|err| ConfigError::Invalid {
            violations: vec![Violation {
                field: "monitor",
                message: err.to_string(),
            }],
        })
    }
}

impl GeneratorConfig {
    fn collect_violations(&self, out: &mut Vec<Violation>) {
        positive(out, "generator.rate", self.rate);
        non_empty_path(out, "generator.log_path", self.log_path.as_os_str().is_empty());
    }
}

fn positive(out: &mut Vec<Violation>, field: &'static str, value: f64) {
    if !value.is_finite() || value <= 0.0 {
        out.push(Violation {
            field,
            message: format!("must be a positive number, got {value}"),
        });
    }
}

fn non_empty_path(out: &mut Vec<Violation>, field: &'static str, empty: bool) {
    if empty {
        out.push(Violation {
            field,
            message: "must not be empty".to_string(),
        });
    }
}
