use crate::cli::watch::{AlertHistory, WatchArgs, render_dashboard, summary_line};
use crate::conf::MonitorConfig;
use crate::monitor::{
    AlertTransition, MemoryLogSource, MonitorParams, TrafficWindow, WindowSnapshot,
};
use crate::record::TIMESTAMP_FORMAT;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

fn params() -> MonitorParams {
    MonitorParams::new(Duration::from_secs(10), 20.0, Duration::from_secs(10)).unwrap()
}

fn sample_snapshot() -> WindowSnapshot {
    let ts = NaiveDate::from_ymd_opt(2015, 5, 30)
        .unwrap()
        .and_hms_opt(14, 13, 9)
        .unwrap()
        .format(TIMESTAMP_FORMAT)
        .to_string();
    let entries = [
        ("127.0.0.1", "GET", "/icons/blank.gif", "200", 100),
        ("289.8.42.1", "POST", "/index.html", "200", 1000),
        ("127.0.0.1", "GET", "/icons/blank.gif", "200", 900),
        ("289.8.42.1", "GET", "/css/display.css", "403", 4000),
        ("127.0.0.1", "GET", "/index.php", "404", 1000),
        ("289.8.42.1", "POST", "/icons/blank.gif", "200", 9000),
        ("127.0.0.1", "GET", "/icons/blank.gif", "403", 4000),
    ];

    let mut source = MemoryLogSource::new();
    for (ip, method, path, status, size) in entries {
        source.push_line(format!(
            "{ip} - - [{ts} +1000] \"{method} {path} HTTP/1.1\" {status} {size}"
        ));
    }

    let mut window = TrafficWindow::new();
    window.ingest_new_lines(&mut source).unwrap();
    window.snapshot(Duration::from_secs(10))
}

//-----------------------------------------------------------------------------
// Dashboard
//-----------------------------------------------------------------------------

#[test]
fn summary_line_truncates_percentages() {
    let snap = sample_snapshot();

    let line = summary_line(&snap, &snap.top_sections(3));

    assert_eq!(line, "icons (57%)   root (28%)   css (14%)");
}

#[test]
fn dashboard_shows_rate_breakdowns_and_status() {
    // Arrange
    let snap = sample_snapshot();
    let history = AlertHistory::new("alerts.log");

    // Act
    let out = render_dashboard(&snap, &params(), &history, false);

    // Assert
    assert!(out.contains("Hits/min: 42   status: OK"));
    assert!(out.contains("Average client data: 2.9 KB/hit"));
    assert!(out.contains("Clients      : 127.0.0.1 (57%)   289.8.42.1 (42%)"));
    assert!(out.contains("Status codes : 200 (57%)   403 (28%)   404 (14%)"));
    assert!(out.contains("Methods      : GET (71%)   POST (28%)"));
    assert!(out.contains("Alerts (stored in alerts.log):"));
    assert!(out.contains("<none>"));
    assert!(!out.contains('\x1b'));
}

#[test]
fn dashboard_flags_active_alert() {
    let mut snap = sample_snapshot();
    snap.alert_active = true;

    let out = render_dashboard(&snap, &params(), &AlertHistory::new("a.log"), false);

    assert!(out.contains("Hits/min: 42 > 20   status: ALERT"));
}

#[test]
fn dashboard_ends_with_alert_history_newest_first() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("alerts.log");
    let mut history = AlertHistory::new(&path);
    let raised = AlertTransition::Raised {
        hits: 7,
        hits_per_minute: 42.0,
        at: NaiveDate::from_ymd_opt(2015, 5, 30)
            .unwrap()
            .and_hms_opt(14, 13, 9)
            .unwrap(),
    };
    let recovered = AlertTransition::Recovered {
        hits: 0,
        hits_per_minute: 0.0,
        at: raised.at(),
    };
    history.record(&raised).unwrap();
    history.record(&recovered).unwrap();

    // Act
    let out = render_dashboard(&sample_snapshot(), &params(), &history, false);

    // Assert
    let expected_tail = format!(
        "Methods      : GET (71%)   POST (28%)\n\nAlerts (stored in {}):\n  {recovered}\n  {raised}\n",
        path.display()
    );
    assert!(out.ends_with(&expected_tail), "unexpected dashboard:\n{out}");
}

#[test]
fn dashboard_on_empty_window() {
    let snap = TrafficWindow::new().snapshot(Duration::from_secs(10));

    let out = render_dashboard(&snap, &params(), &AlertHistory::new("a.log"), false);

    assert!(out.contains("Hits/min: 0   status: OK"));
    assert!(out.contains("Average client data: 0.0 KB/hit"));
    assert!(out.contains("Sections     : \n"));
}

#[test]
fn json_snapshot_serializes_aggregates() {
    let snap = sample_snapshot();

    let json: serde_json::Value = serde_json::to_value(&snap).unwrap();

    assert_eq!(json["total_hits"], 7);
    assert_eq!(json["total_size"], 20_000);
    assert_eq!(json["sections"]["icons"], 4);
    assert_eq!(json["alert_active"], false);
}

//-----------------------------------------------------------------------------
// Overrides
//-----------------------------------------------------------------------------

#[test]
fn command_line_overrides_file_settings() {
    // Arrange
    let args = WatchArgs {
        log: Some(PathBuf::from("/tmp/other.log")),
        threshold: Some(50.0),
        ..WatchArgs::default()
    };

    // Act
    let cfg = args.resolve(&MonitorConfig::default());

    // Assert
    assert_eq!(cfg.log_path, PathBuf::from("/tmp/other.log"));
    assert_eq!(cfg.alert_threshold, 50.0);
    assert_eq!(cfg.monitor_duration, 120.0);
    assert_eq!(cfg.alert_log, PathBuf::from("alerts.log"));
}

#[test]
fn invalid_override_is_rejected() {
    let args = WatchArgs {
        duration: Some(-5.0),
        ..WatchArgs::default()
    };

    let cfg = args.resolve(&MonitorConfig::default());

    assert!(cfg.to_params().is_err());
}
