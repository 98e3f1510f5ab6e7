use crate::monitor::top_entries;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

/// Owned, point-in-time copy of the window aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSnapshot {
    pub total_hits: u64,
    pub total_size: u64,
    pub hits_per_minute: f64,

    pub sections: HashMap<String, u64>,
    pub ips: HashMap<String, u64>,
    pub methods: HashMap<String, u64>,
    pub statuses: HashMap<String, u64>,

    pub alert_active: bool,
    pub lines_consumed: usize,
    pub last_read_time: Option<NaiveDateTime>,
}

impl WindowSnapshot {
    /// Mean response size in bytes, zero for an empty window.
    pub fn average_size(&self) -> f64 {
        if self.total_hits == 0 {
            return 0.0;
        }
        self.total_size as f64 / self.total_hits as f64
    }

    /// Percentage of windowed hits that `count` represents.
    pub fn share(&self, count: u64) -> f64 {
        if self.total_hits == 0 {
            return 0.0;
        }
        count as f64 / self.total_hits as f64 * 100.0
    }

    pub fn top_sections(&self, n: usize) -> Vec<(String, u64)> {
        top_entries(&self.sections, n)
    }

    pub fn top_ips(&self, n: usize) -> Vec<(String, u64)> {
        top_entries(&self.ips, n)
    }

    pub fn top_methods(&self, n: usize) -> Vec<(String, u64)> {
        top_entries(&self.methods, n)
    }

    pub fn top_statuses(&self, n: usize) -> Vec<(String, u64)> {
        top_entries(&self.statuses, n)
    }
}
