use super::helpers::{hit_at, line, record, sample_lines, secs, t0};
use crate::monitor::{AlertTransition, MemoryLogSource, MonitorError, TrafficWindow};
use crate::record::parse_line;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::time::Duration;

const WINDOW: Duration = Duration::from_secs(10);
const THRESHOLD: f64 = 20.0;

fn counts(pairs: &[(&str, u64)]) -> HashMap<String, u64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Recomputes every aggregate from the records themselves.
fn assert_consistent(window: &TrafficWindow) {
    let mut sections = HashMap::new();
    let mut ips = HashMap::new();
    let mut methods = HashMap::new();
    let mut statuses = HashMap::new();
    let mut size = 0;

    for r in window.records() {
        *sections.entry(r.section.clone()).or_insert(0) += 1;
        *ips.entry(r.source_ip.clone()).or_insert(0) += 1;
        *methods.entry(r.method.clone()).or_insert(0) += 1;
        *statuses.entry(r.status_code.clone()).or_insert(0) += 1;
        size += r.response_size;
    }

    assert_eq!(window.total_hits(), window.len() as u64);
    assert_eq!(window.total_size(), size);
    assert_eq!(window.sections().to_map(), sections);
    assert_eq!(window.ips().to_map(), ips);
    assert_eq!(window.methods().to_map(), methods);
    assert_eq!(window.statuses().to_map(), statuses);
}

//-----------------------------------------------------------------------------
// Admission
//-----------------------------------------------------------------------------

#[test]
fn admit_updates_every_aggregate() {
    // Arrange
    let mut window = TrafficWindow::new();
    let r = record("10.0.0.1", "POST", "/api/login", "201", 512, t0());

    // Act
    window.admit_record(r.clone());

    // Assert
    assert_eq!(window.oldest(), Some(&r));
    assert_eq!(window.total_hits(), 1);
    assert_eq!(window.total_size(), 512);
    assert_eq!(window.sections().to_map(), counts(&[("api", 1)]));
    assert_eq!(window.ips().to_map(), counts(&[("10.0.0.1", 1)]));
    assert_eq!(window.methods().to_map(), counts(&[("POST", 1)]));
    assert_eq!(window.statuses().to_map(), counts(&[("201", 1)]));
}

#[test]
fn admitting_malformed_line_is_a_no_op() {
    // Arrange
    let mut window = TrafficWindow::new();
    window.admit_record(hit_at(t0()));
    let before = window.snapshot(WINDOW);

    // Act
    let admitted = window.admit(parse_line("This is not a formatted entry\n"));

    // Assert
    assert!(!admitted);
    assert_eq!(window.snapshot(WINDOW), before);
    assert_eq!(window.len(), 1);
}

#[test]
fn totals_match_admitted_records() {
    // Arrange
    let mut window = TrafficWindow::new();
    let sizes = [0, 1, 17, 4096, 100_000];

    // Act
    for (i, size) in sizes.iter().enumerate() {
        window.admit_record(record(
            &format!("10.0.0.{i}"),
            "GET",
            "/a/b",
            "200",
            *size,
            t0(),
        ));
    }

    // Assert
    assert_eq!(window.total_hits(), sizes.len() as u64);
    assert_eq!(window.total_size(), sizes.iter().sum::<u64>());
    assert_consistent(&window);
}

//-----------------------------------------------------------------------------
// Eviction
//-----------------------------------------------------------------------------

#[test]
fn evict_oldest_removes_first_arrival() {
    // Arrange
    let mut window = TrafficWindow::new();
    let first = record("1.1.1.1", "GET", "/a/x", "200", 10, t0());
    let second = record("2.2.2.2", "PUT", "/b/y", "500", 20, t0());
    window.admit_record(first.clone());
    window.admit_record(second.clone());

    // Act
    let evicted = window.evict_oldest().unwrap();

    // Assert
    assert_eq!(evicted, first);
    assert_eq!(window.oldest(), Some(&second));
    assert_eq!(window.total_hits(), 1);
    assert_eq!(window.total_size(), 20);
    assert_eq!(window.sections().to_map(), counts(&[("b", 1)]));
    assert_eq!(window.ips().to_map(), counts(&[("2.2.2.2", 1)]));
    assert_eq!(window.methods().to_map(), counts(&[("PUT", 1)]));
    assert_eq!(window.statuses().to_map(), counts(&[("500", 1)]));
}

#[test]
fn admit_then_evict_restores_previous_aggregates() {
    // Arrange
    let mut window = TrafficWindow::new();
    let lines = sample_lines(t0());
    let (head, tail) = lines.split_at(3);
    for l in tail {
        window.admit(parse_line(l));
    }
    let expected = window.snapshot(WINDOW);

    let mut replayed = TrafficWindow::new();
    for l in head.iter().chain(tail) {
        replayed.admit(parse_line(l));
    }

    // Act
    for _ in head {
        replayed.evict_oldest().unwrap();
    }

    // Assert
    assert_eq!(replayed.snapshot(WINDOW), expected);
    assert_consistent(&replayed);
}

#[test]
fn evicting_single_record_restores_empty_state() {
    // Arrange
    let mut window = TrafficWindow::new();
    let empty = window.snapshot(WINDOW);

    // Act
    window.admit_record(hit_at(t0()));
    window.evict_oldest().unwrap();

    // Assert
    assert_eq!(window.snapshot(WINDOW), empty);
    assert!(window.sections().is_empty());
    assert!(window.ips().is_empty());
}

#[test]
fn evicting_from_empty_window_fails_loudly() {
    let mut window = TrafficWindow::new();

    let err = window.evict_oldest().unwrap_err();

    assert!(matches!(err, MonitorError::EmptyWindow));
    assert_eq!(window.total_hits(), 0);
}

//-----------------------------------------------------------------------------
// Expiry
//-----------------------------------------------------------------------------

#[test]
fn drop_expired_removes_only_records_older_than_window() {
    // Arrange
    let now = t0();
    let mut window = TrafficWindow::new();
    window.admit_record(hit_at(now - secs(36_000)));
    window.admit_record(hit_at(now - secs(11)));
    window.admit_record(hit_at(now - secs(10)));
    window.admit_record(hit_at(now));

    // Act
    let evicted = window.drop_expired(now, WINDOW);

    // Assert
    assert_eq!(evicted, 2);
    assert_eq!(window.len(), 2);
    assert_eq!(window.oldest().unwrap().timestamp, now - secs(10));
    assert_consistent(&window);
}

#[test]
fn drop_expired_on_empty_window_is_a_no_op() {
    let mut window = TrafficWindow::new();

    assert_eq!(window.drop_expired(t0(), WINDOW), 0);
}

#[test]
fn drop_expired_only_inspects_the_front() {
    // Arrange: an out-of-order stale record behind a fresh one
    let now = t0();
    let mut window = TrafficWindow::new();
    window.admit_record(hit_at(now));
    window.admit_record(hit_at(now - secs(3600)));

    // Act
    let evicted = window.drop_expired(now, WINDOW);

    // Assert
    assert_eq!(evicted, 0);
    assert_eq!(window.len(), 2);
}

//-----------------------------------------------------------------------------
// Alerting
//-----------------------------------------------------------------------------

#[test]
fn rate_is_normalized_per_minute() {
    let mut window = TrafficWindow::new();
    for _ in 0..5 {
        window.admit_record(hit_at(t0()));
    }

    assert_eq!(window.hits_per_minute(Duration::from_secs(10)), 30.0);
    assert_eq!(window.hits_per_minute(Duration::from_secs(120)), 2.5);
}

#[test]
fn crossing_threshold_raises_alert_once() {
    // Arrange: ceil(2 * 20 * 10 / 60) = 7 hits -> 42 hits/min
    let mut window = TrafficWindow::new();
    for _ in 0..7 {
        window.admit_record(hit_at(t0()));
    }

    // Act
    let first = window.evaluate_alert(t0(), WINDOW, THRESHOLD);
    let second = window.evaluate_alert(t0() + secs(1), WINDOW, THRESHOLD);

    // Assert
    assert_eq!(
        first,
        Some(AlertTransition::Raised {
            hits: 7,
            hits_per_minute: 42.0,
            at: t0(),
        })
    );
    assert_eq!(second, None);
    assert!(window.alert_active());
}

#[test]
fn rate_at_threshold_does_not_raise() {
    // 20 hits/min over a 60s window is exactly the threshold
    let mut window = TrafficWindow::new();
    for _ in 0..20 {
        window.admit_record(hit_at(t0()));
    }

    let transition = window.evaluate_alert(t0(), Duration::from_secs(60), THRESHOLD);

    assert_eq!(transition, None);
    assert!(!window.alert_active());
}

#[test]
fn alert_recovers_after_records_expire() {
    // Arrange
    let mut window = TrafficWindow::new();
    for _ in 0..7 {
        window.admit_record(hit_at(t0()));
    }
    window.evaluate_alert(t0(), WINDOW, THRESHOLD).unwrap();

    // Act
    let later = t0() + secs(11);
    window.drop_expired(later, WINDOW);
    let transition = window.evaluate_alert(later, WINDOW, THRESHOLD);

    // Assert
    assert_eq!(
        transition,
        Some(AlertTransition::Recovered {
            hits: 0,
            hits_per_minute: 0.0,
            at: later,
        })
    );
    assert!(!window.alert_active());
}

#[test]
fn alert_stays_raised_while_rate_remains_high() {
    // Arrange
    let mut window = TrafficWindow::new();
    for _ in 0..7 {
        window.admit_record(hit_at(t0()));
    }
    window.evaluate_alert(t0(), WINDOW, THRESHOLD).unwrap();

    // Act: one eviction leaves 6 hits = 36/min, still above 20
    window.evict_oldest().unwrap();
    let transition = window.evaluate_alert(t0(), WINDOW, THRESHOLD);

    // Assert
    assert_eq!(transition, None);
    assert!(window.alert_active());
}

//-----------------------------------------------------------------------------
// Ingestion
//-----------------------------------------------------------------------------

#[test]
fn ingest_summarizes_sample_lines() {
    // Arrange
    let mut source = MemoryLogSource::new();
    source.extend(sample_lines(t0()));
    let mut window = TrafficWindow::new();

    // Act
    let report = window.ingest_new_lines(&mut source).unwrap();

    // Assert
    assert_eq!(report.lines_read, 7);
    assert_eq!(report.admitted, 7);
    assert_eq!(window.total_hits(), 7);
    assert_eq!(window.total_size(), 20_000);
    assert_eq!(
        window.sections().to_map(),
        counts(&[("icons", 4), ("root", 2), ("css", 1)])
    );
    assert_eq!(
        window.ips().to_map(),
        counts(&[("127.0.0.1", 4), ("289.8.42.1", 3)])
    );
    assert_eq!(window.methods().to_map(), counts(&[("GET", 5), ("POST", 2)]));
    assert_eq!(
        window.statuses().to_map(),
        counts(&[("200", 4), ("403", 2), ("404", 1)])
    );
}

#[test]
fn ingest_counts_malformed_lines_toward_marker() {
    // Arrange
    let mut source = MemoryLogSource::new();
    source.push_line(line("1.1.1.1", "GET", "/", "200", 1, t0()));
    source.push_line("this is not a formatted entry");
    source.push_line(line("1.1.1.1", "GET", "/", "200", 1, t0()));
    let mut window = TrafficWindow::new();

    // Act
    let report = window.ingest_new_lines(&mut source).unwrap();

    // Assert
    assert_eq!(report.lines_read, 3);
    assert_eq!(report.admitted, 2);
    assert_eq!(report.malformed, 1);
    assert_eq!(window.last_read_marker(), 3);
    assert_eq!(window.total_hits(), 2);
}

#[test]
fn repeated_ingest_without_new_lines_is_idempotent() {
    // Arrange
    let mut source = MemoryLogSource::new();
    source.extend(sample_lines(t0()));
    let mut window = TrafficWindow::new();
    window.ingest_new_lines(&mut source).unwrap();
    let before = window.snapshot(WINDOW);

    // Act
    let report = window.ingest_new_lines(&mut source).unwrap();

    // Assert
    assert_eq!(report.lines_read, 0);
    assert_eq!(window.snapshot(WINDOW), before);
}

#[test]
fn ingest_is_cumulative() {
    // Arrange
    let mut source = MemoryLogSource::new();
    source.push_line(line("1.1.1.1", "GET", "/", "200", 1, t0()));
    source.push_line(line("1.1.1.1", "GET", "/", "200", 1, t0()));
    let mut window = TrafficWindow::new();
    window.ingest_new_lines(&mut source).unwrap();

    // Act
    source.push_line(line("2.2.2.2", "GET", "/x/y", "200", 5, t0()));
    window.ingest_new_lines(&mut source).unwrap();

    // Assert
    assert_eq!(window.len(), 3);
    assert_eq!(window.last_read_marker(), 3);
    assert_eq!(window.total_size(), 7);
}

#[test]
fn unreadable_source_leaves_window_untouched() {
    // Arrange
    let mut source = MemoryLogSource::new();
    source.extend(sample_lines(t0()));
    let mut window = TrafficWindow::new();
    window.ingest_new_lines(&mut source).unwrap();
    source.push_line(line("1.1.1.1", "GET", "/", "200", 1, t0()));
    source.set_unavailable(true);
    let before = window.snapshot(WINDOW);

    // Act
    let err = window.ingest_new_lines(&mut source).unwrap_err();

    // Assert
    assert!(matches!(err, MonitorError::SourceUnavailable { .. }));
    assert_eq!(window.snapshot(WINDOW), before);
    assert_eq!(window.last_read_marker(), 7);
}

//-----------------------------------------------------------------------------
// Snapshot
//-----------------------------------------------------------------------------

#[test]
fn snapshot_reports_averages_and_top_entries() {
    // Arrange
    let mut source = MemoryLogSource::new();
    source.extend(sample_lines(t0()));
    let mut window = TrafficWindow::new();
    window.ingest_new_lines(&mut source).unwrap();

    // Act
    let snap = window.snapshot(WINDOW);

    // Assert
    assert_eq!(snap.lines_consumed, 7);
    assert_eq!(snap.hits_per_minute, 42.0);
    assert!((snap.average_size() - 20_000.0 / 7.0).abs() < 1e-9);
    assert_eq!(
        snap.top_sections(2),
        vec![("icons".to_string(), 4), ("root".to_string(), 2)]
    );
    assert_eq!(snap.top_methods(1), vec![("GET".to_string(), 5)]);
    assert!(!snap.alert_active);
}
