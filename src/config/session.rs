//! Session retention configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::SweeperConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Maximum history entries kept per session
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Sessions idle this long are evicted
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Upper bound on live sessions; the least recently used idle one is evicted
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl SessionConfig {
    pub fn sweeper_config(&self) -> SweeperConfig {
        SweeperConfig {
            idle_timeout: Duration::from_secs(self.idle_timeout_secs),
            interval: Duration::from_secs(self.sweep_interval_secs),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.history_limit == 0 {
            return Err(ValidationError::NonPositive("history_limit"));
        }
        if self.idle_timeout_secs == 0 {
            return Err(ValidationError::NonPositive("idle_timeout_secs"));
        }
        if self.max_sessions == 0 {
            return Err(ValidationError::NonPositive("max_sessions"));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ValidationError::NonPositive("sweep_interval_secs"));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            idle_timeout_secs: default_idle_timeout(),
            max_sessions: default_max_sessions(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_history_limit() -> usize {
    crate::domain::intake::DEFAULT_HISTORY_LIMIT
}

fn default_idle_timeout() -> u64 {
    1800
}

fn default_max_sessions() -> usize {
    crate::adapters::storage::DEFAULT_MAX_SESSIONS
}

fn default_sweep_interval() -> u64 {
    60
}
