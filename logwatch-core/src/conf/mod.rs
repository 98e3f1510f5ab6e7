//! HCL configuration for the monitor and the synthetic generator.

mod error;
mod loader;
mod types;
mod validate;

pub use error::ConfigError;
pub use loader::{DEFAULT_CONFIG_PATH, load_config, load_or_default, parse_config};
pub use types::{GeneratorConfig, LogwatchConfig, MonitorConfig};
pub use validate::Violation;
