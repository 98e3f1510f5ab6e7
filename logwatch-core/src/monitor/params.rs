use crate::monitor::MonitorError;
use std::time::Duration;

/// Validated monitor settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorParams {
    /// Time between polling ticks.
    pub refresh_period: Duration,
    /// Hits per minute above which the alert is raised.
    pub alert_threshold: f64,
    /// Length of the trailing window.
    pub monitor_duration: Duration,
}

impl MonitorParams {
    pub fn new(
        refresh_period: Duration,
        alert_threshold: f64,
        monitor_duration: Duration,
    ) -> Result<Self, MonitorError> {
        if refresh_period.is_zero() {
            return Err(MonitorError::invalid("refresh_period", "must be positive"));
        }
        if monitor_duration.is_zero() {
            return Err(MonitorError::invalid("monitor_duration", "must be positive"));
        }
        if !alert_threshold.is_finite() || alert_threshold <= 0.0 {
            return Err(MonitorError::invalid(
                "alert_threshold",
                format!("must be a positive number, got {alert_threshold}"),
            ));
        }

        Ok(Self {
            refresh_period,
            alert_threshold,
            monitor_duration,
        })
    }

    /// Builds params from second counts, rejecting negative or non-finite
    /// values instead of clamping them.
    pub fn from_secs(
        refresh_secs: f64,
        alert_threshold: f64,
        monitor_secs: f64,
    ) -> Result<Self, MonitorError> {
        let refresh_period = secs_to_duration("refresh_period", refresh_secs)?;
        let monitor_duration = secs_to_duration("monitor_duration", monitor_secs)?;
        Self::new(refresh_period, alert_threshold, monitor_duration)
    }
}

fn secs_to_duration(name: &'static str, secs: f64) -> Result<Duration, MonitorError> {
    Duration::try_from_secs_f64(secs)
        .map_err(|_| MonitorError::invalid(name, format!("must be a positive number, got {secs}")))
}
