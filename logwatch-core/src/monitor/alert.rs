use crate::record::TIMESTAMP_FORMAT;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertState {
    #[default]
    Normal,
    Alerting,
}

impl AlertState {
    pub fn is_active(self) -> bool {
        matches!(self, AlertState::Alerting)
    }
}

/// A change of alert state, reported only on a threshold crossing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertTransition {
    Raised {
        hits: u64,
        hits_per_minute: f64,
        at: NaiveDateTime,
    },
    Recovered {
        hits: u64,
        hits_per_minute: f64,
        at: NaiveDateTime,
    },
}

impl AlertTransition {
    pub fn is_raised(&self) -> bool {
        matches!(self, AlertTransition::Raised { .. })
    }

    pub fn at(&self) -> NaiveDateTime {
        match self {
            AlertTransition::Raised { at, .. } | AlertTransition::Recovered { at, .. } => *at,
        }
    }

    pub fn hits(&self) -> u64 {
        match self {
            AlertTransition::Raised { hits, .. } | AlertTransition::Recovered { hits, .. } => *hits,
        }
    }

    pub fn hits_per_minute(&self) -> f64 {
        match self {
            AlertTransition::Raised {
                hits_per_minute, ..
            }
            | AlertTransition::Recovered {
                hits_per_minute, ..
            } => *hits_per_minute,
        }
    }

    /// State the monitor is in after this transition.
    pub fn state(&self) -> AlertState {
        match self {
            AlertTransition::Raised { .. } => AlertState::Alerting,
            AlertTransition::Recovered { .. } => AlertState::Normal,
        }
    }
}

impl fmt::Display for AlertTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertTransition::Raised {
                hits,
                hits_per_minute,
                at,
            } => write!(
                f,
                "High traffic generated an alert - hits = {}, hits/min = {:.0}, triggered at {}",
                hits,
                hits_per_minute,
                at.format(TIMESTAMP_FORMAT)
            ),
            AlertTransition::Recovered {
                hits,
                hits_per_minute,
                at,
            } => write!(
                f,
                "Traffic recovered - hits = {}, hits/min = {:.0}, recovered at {}",
                hits,
                hits_per_minute,
                at.format(TIMESTAMP_FORMAT)
            ),
        }
    }
}
