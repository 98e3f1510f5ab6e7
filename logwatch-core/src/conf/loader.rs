use crate::conf::{ConfigError, LogwatchConfig};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "logwatch.hcl";

/// Reads, parses and validates a config file.
pub fn load_config(path: &Path) -> Result<LogwatchConfig, ConfigError> {
    let s = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let cfg = parse_config(&s, path)?;

    tracing::debug!(path = %path.display(), "config loaded");
    Ok(cfg)
}

/// Parses and validates config text. `origin` is only used in errors.
pub fn parse_config(s: &str, origin: &Path) -> Result<LogwatchConfig, ConfigError> {
    let cfg: LogwatchConfig = hcl::from_str(s).map_err(|e| ConfigError::parse(origin, e))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Loads `path` when given. Without one, loads [`DEFAULT_CONFIG_PATH`] if it
/// exists and falls back to built-in defaults otherwise.
pub fn load_or_default(path: Option<&Path>) -> Result<LogwatchConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.is_file() {
                load_config(default)
            } else {
                Ok(LogwatchConfig::default())
            }
        }
    }
}
