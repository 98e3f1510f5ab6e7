//! Synthetic access-log writer.
//!
//! Appends randomly generated Common Log Format lines to a file at a
//! configurable average rate. Used to exercise the monitor without a real
//! web server in front of it.

mod pools;
mod writer;

pub use writer::{GeneratorError, GeneratorHandle, LogGenerator};
