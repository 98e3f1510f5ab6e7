pub mod access_log;
pub mod tracing;

pub use access_log::{AccessLog, clf_line, sample_lines, t0};
pub use tracing::{CapturedEvent, EventLog, capture_events};
