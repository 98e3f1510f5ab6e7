use crate::monitor::{
    AlertState, AlertTransition, LogSource, MonitorError, Tally, WindowSnapshot,
};
use crate::record::{LogRecord, ParsedLine, parse_line};
use chrono::{NaiveDateTime, TimeDelta};
use std::collections::VecDeque;
use std::time::Duration;

/// Outcome of one [`TrafficWindow::ingest_new_lines`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Lines consumed from the source, malformed ones included.
    pub lines_read: usize,
    pub admitted: usize,
    pub malformed: usize,
}

/// Records currently inside the trailing window, plus running aggregates.
///
/// Every aggregate is maintained incrementally: [`admit_record`] adds a
/// record's contribution and [`evict_oldest`] subtracts exactly that
/// contribution again. At all times the totals and tallies equal what
/// summing `records` would produce.
///
/// [`admit_record`]: TrafficWindow::admit_record
/// [`evict_oldest`]: TrafficWindow::evict_oldest
#[derive(Debug, Default)]
pub struct TrafficWindow {
    // arrival order, oldest first
    records: VecDeque<LogRecord>,

    total_hits: u64,
    total_size: u64,
    sections: Tally,
    ips: Tally,
    methods: Tally,
    statuses: Tally,

    // lines consumed from the source; never rewinds
    last_read_marker: usize,

    alert: AlertState,
    last_read_time: Option<NaiveDateTime>,
}

impl TrafficWindow {
    pub fn new() -> Self {
        Self::default()
    }

    //-------------------------------------------------------------------------
    // Admission / eviction
    //-------------------------------------------------------------------------

    /// Admits a parsed line. Malformed lines are dropped without touching
    /// any aggregate; returns whether the line was admitted.
    pub fn admit(&mut self, line: ParsedLine) -> bool {
        match line {
            ParsedLine::WellFormed(record) => {
                self.admit_record(record);
                true
            }
            ParsedLine::Malformed(err) => {
                tracing::trace!(error = %err, "dropping malformed log line");
                false
            }
        }
    }

    pub fn admit_record(&mut self, record: LogRecord) {
        self.total_hits += 1;
        self.total_size += record.response_size;
        self.sections.increment(&record.section);
        self.ips.increment(&record.source_ip);
        self.methods.increment(&record.method);
        self.statuses.increment(&record.status_code);
        self.records.push_back(record);
    }

    /// Removes the earliest-arrived record and reverses its contribution.
    ///
    /// Evicting from an empty window is a caller bug and is reported as
    /// [`MonitorError::EmptyWindow`] with the window left untouched.
    pub fn evict_oldest(&mut self) -> Result<LogRecord, MonitorError> {
        let record = self.records.pop_front().ok_or(MonitorError::EmptyWindow)?;

        self.total_hits -= 1;
        self.total_size -= record.response_size;

        let consistent = self.sections.decrement(&record.section)
            & self.ips.decrement(&record.source_ip)
            & self.methods.decrement(&record.method)
            & self.statuses.decrement(&record.status_code);
        debug_assert!(consistent, "window tallies drifted from records");

        Ok(record)
    }

    //-------------------------------------------------------------------------
    // Tick steps
    //-------------------------------------------------------------------------

    /// Reads every line past the read marker, admits the well-formed ones
    /// and advances the marker by the number of lines consumed.
    ///
    /// Calling this again with nothing appended is a no-op. If the source
    /// cannot be read the window is left exactly as it was.
    pub fn ingest_new_lines(
        &mut self,
        source: &mut dyn LogSource,
    ) -> Result<IngestReport, MonitorError> {
        let lines = source
            .read_lines_after(self.last_read_marker)
            .map_err(|source| MonitorError::SourceUnavailable { source })?;

        Ok(self.ingest_lines(&lines))
    }

    /// Admits lines already read from past the read marker and advances the
    /// marker by `lines.len()`.
    pub fn ingest_lines(&mut self, lines: &[String]) -> IngestReport {
        let mut report = IngestReport {
            lines_read: lines.len(),
            ..IngestReport::default()
        };

        for line in lines {
            if self.admit(parse_line(line)) {
                report.admitted += 1;
            } else {
                report.malformed += 1;
            }
        }

        self.last_read_marker += lines.len();

        if report.lines_read > 0 {
            tracing::debug!(
                lines_read = report.lines_read,
                admitted = report.admitted,
                malformed = report.malformed,
                marker = self.last_read_marker,
                "ingested new log lines"
            );
        }

        report
    }

    /// Evicts from the front while the oldest record is older than
    /// `now - monitor_duration`. Only the front is inspected, so a record
    /// that arrived out of timestamp order stays until everything before it
    /// has expired. Returns the number of evicted records.
    pub fn drop_expired(&mut self, now: NaiveDateTime, monitor_duration: Duration) -> usize {
        let Some(cutoff) = TimeDelta::from_std(monitor_duration)
            .ok()
            .and_then(|window| now.checked_sub_signed(window))
        else {
            return 0;
        };

        let mut evicted = 0;
        while self.records.front().is_some_and(|r| r.timestamp < cutoff) {
            if self.evict_oldest().is_err() {
                break;
            }
            evicted += 1;
        }

        evicted
    }

    /// Re-evaluates the alert against the current hit rate.
    ///
    /// A transition is only reported when the rate crosses the threshold:
    /// above it while normal raises, at or below it while alerting recovers.
    pub fn evaluate_alert(
        &mut self,
        now: NaiveDateTime,
        monitor_duration: Duration,
        alert_threshold: f64,
    ) -> Option<AlertTransition> {
        let hits_per_minute = self.hits_per_minute(monitor_duration);

        match self.alert {
            AlertState::Normal if hits_per_minute > alert_threshold => {
                self.alert = AlertState::Alerting;
                Some(AlertTransition::Raised {
                    hits: self.total_hits,
                    hits_per_minute,
                    at: now,
                })
            }
            AlertState::Alerting if hits_per_minute <= alert_threshold => {
                self.alert = AlertState::Normal;
                Some(AlertTransition::Recovered {
                    hits: self.total_hits,
                    hits_per_minute,
                    at: now,
                })
            }
            _ => None,
        }
    }

    pub fn mark_read(&mut self, now: NaiveDateTime) {
        self.last_read_time = Some(now);
    }

    //-------------------------------------------------------------------------
    // Read access
    //-------------------------------------------------------------------------

    /// Windowed hit rate, normalized to hits per minute.
    pub fn hits_per_minute(&self, monitor_duration: Duration) -> f64 {
        let secs = monitor_duration.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.total_hits as f64 / secs * 60.0
    }

    pub fn snapshot(&self, monitor_duration: Duration) -> WindowSnapshot {
        WindowSnapshot {
            total_hits: self.total_hits,
            total_size: self.total_size,
            hits_per_minute: self.hits_per_minute(monitor_duration),
            sections: self.sections.to_map(),
            ips: self.ips.to_map(),
            methods: self.methods.to_map(),
            statuses: self.statuses.to_map(),
            alert_active: self.alert.is_active(),
            lines_consumed: self.last_read_marker,
            last_read_time: self.last_read_time,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &LogRecord> {
        self.records.iter()
    }

    pub fn oldest(&self) -> Option<&LogRecord> {
        self.records.front()
    }

    pub fn total_hits(&self) -> u64 {
        self.total_hits
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn sections(&self) -> &Tally {
        &self.sections
    }

    pub fn ips(&self) -> &Tally {
        &self.ips
    }

    pub fn methods(&self) -> &Tally {
        &self.methods
    }

    pub fn statuses(&self) -> &Tally {
        &self.statuses
    }

    pub fn alert_state(&self) -> AlertState {
        self.alert
    }

    pub fn alert_active(&self) -> bool {
        self.alert.is_active()
    }

    pub fn last_read_marker(&self) -> usize {
        self.last_read_marker
    }

    pub fn last_read_time(&self) -> Option<NaiveDateTime> {
        self.last_read_time
    }
}
