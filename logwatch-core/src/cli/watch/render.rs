use crate::cli::watch::constants::{CLEAR_SCREEN, TOP_N};
use crate::cli::watch::history::AlertHistory;
use crate::monitor::{MonitorParams, WindowSnapshot};
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Renders the dashboard text. ANSI colors are only emitted when `color`
/// is set.
pub fn render_dashboard(
    snapshot: &WindowSnapshot,
    params: &MonitorParams,
    history: &AlertHistory,
    color: bool,
) -> String {
    let mut out = String::new();

    let title = "logwatch - HTTP traffic monitor";
    out.push_str(&format!("{}\n", bold(title, color)));
    out.push_str(&format!("{}\n\n", "=".repeat(title.len())));

    out.push_str(&format!(
        "Alert threshold = {} hits/min | Refresh period = {}s | Monitor duration = {}s\n\n",
        params.alert_threshold,
        params.refresh_period.as_secs_f64(),
        params.monitor_duration.as_secs_f64(),
    ));

    let rate = format!("{:.0}", snapshot.hits_per_minute);
    if snapshot.alert_active {
        let status = if color {
            "status: ALERT".red().bold().to_string()
        } else {
            "status: ALERT".to_string()
        };
        out.push_str(&format!(
            "Hits/min: {} > {}   {status}\n",
            bold(&rate, color),
            params.alert_threshold
        ));
    } else {
        let status = if color {
            "status: OK".green().to_string()
        } else {
            "status: OK".to_string()
        };
        out.push_str(&format!("Hits/min: {}   {status}\n", bold(&rate, color)));
    }

    out.push_str(&format!(
        "Hits in window: {} | Average client data: {:.1} KB/hit\n\n",
        snapshot.total_hits,
        snapshot.average_size() / 1000.0
    ));

    let rows = [
        ("Sections", snapshot.top_sections(TOP_N)),
        ("Clients", snapshot.top_ips(TOP_N)),
        ("Status codes", snapshot.top_statuses(TOP_N)),
        ("Methods", snapshot.top_methods(TOP_N)),
    ];
    for (label, top) in rows {
        let line = summary_line(snapshot, &top);
        if color {
            out.push_str(&format!("{label:<13}: {}\n", line.magenta()));
        } else {
            out.push_str(&format!("{label:<13}: {line}\n"));
        }
    }

    out.push('\n');
    out.push_str(&bold(
        &format!("Alerts (stored in {}):", history.path().display()),
        color,
    ));
    out.push('\n');
    if history.is_empty() {
        out.push_str("  <none>\n");
    }
    for message in history.recent() {
        out.push_str(&format!("  {message}\n"));
    }

    out
}

/// `key (pct%)` for each entry, percentages truncated toward zero.
pub fn summary_line(snapshot: &WindowSnapshot, top: &[(String, u64)]) -> String {
    top.iter()
        .map(|(key, count)| format!("{key} ({}%)", snapshot.share(*count).floor() as u64))
        .collect::<Vec<_>>()
        .join("   ")
}

pub fn redraw(output: &str) {
    print!("{CLEAR_SCREEN}");
    println!("{output}");
    let _ = io::stdout().flush();
}

fn bold(s: &str, color: bool) -> String {
    if color {
        s.bold().to_string()
    } else {
        s.to_string()
    }
}
