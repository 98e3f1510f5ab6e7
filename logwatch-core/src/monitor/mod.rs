//! Windowed traffic monitor.
//!
//! The monitor keeps every well-formed record whose timestamp falls inside
//! a trailing window, maintains running aggregates over them, and raises a
//! high-traffic alert when the windowed rate crosses a threshold. The alert
//! only changes state on a crossing, so it does not flicker on every poll.
//!
//! The overall data flow of one polling tick is:
//!
//! LogSource
//! parse_line
//! TrafficWindow::admit
//! TrafficWindow::drop_expired
//! TrafficWindow::evaluate_alert
//! AlertTransition (broadcast)
//!
//! Readers observe the window through [`WindowSnapshot`]s taken under the
//! same lock the polling tick holds, so they never see a half-applied tick.

mod alert;
mod clock;
mod error;
mod params;
mod poller;
mod snapshot;
mod source;
mod tally;
#[cfg(test)]
mod tests;
mod window;

pub use alert::{AlertState, AlertTransition};
pub use clock::{Clock, ManualClock, SystemClock, truncate_to_second};
pub use error::MonitorError;
pub use params::MonitorParams;
pub use poller::{MonitorHandle, TickReport, TrafficMonitor, WindowReader};
pub use snapshot::WindowSnapshot;
pub use source::{FileLogSource, LogSource, MemoryLogSource};
pub use tally::{Tally, top_entries};
pub use window::{IngestReport, TrafficWindow};
