use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("cannot evict from an empty window")]
    EmptyWindow,

    #[error("log source unavailable: {source}")]
    SourceUnavailable {
        #[source]
        source: std::io::Error,
    },

    #[error("invalid monitor parameter '{name}': {reason}")]
    InvalidParams { name: &'static str, reason: String },
}

impl MonitorError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            name,
            reason: reason.into(),
        }
    }
}
