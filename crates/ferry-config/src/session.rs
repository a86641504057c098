use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::env_value;

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_evaluation_threshold_ms() -> u64 {
    10_000
}

fn default_retry_interval_ms() -> u64 {
    250
}

fn default_restore_delay_ms() -> u64 {
    500
}

/// Timing of a single provider session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Absolute deadline from the start of loading until navigation finishes
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// How long extraction may keep retrying after navigation finished
    #[serde(default = "default_evaluation_threshold_ms")]
    pub evaluation_threshold_ms: u64,
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,
    /// Settle time after a page had to be put back into the requested language pair
    #[serde(default = "default_restore_delay_ms")]
    pub restore_delay_ms: u64,
}

impl SessionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn evaluation_threshold(&self) -> Duration {
        Duration::from_millis(self.evaluation_threshold_ms)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    pub fn restore_delay(&self) -> Duration {
        Duration::from_millis(self.restore_delay_ms)
    }

    pub(crate) fn apply_env(&mut self) {
        if let Some(value) = env_value("FERRY_SESSION_TIMEOUT_MS") {
            self.timeout_ms = value;
        }
        if let Some(value) = env_value("FERRY_EVALUATION_THRESHOLD_MS") {
            self.evaluation_threshold_ms = value;
        }
        if let Some(value) = env_value("FERRY_RETRY_INTERVAL_MS") {
            self.retry_interval_ms = value;
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            evaluation_threshold_ms: default_evaluation_threshold_ms(),
            retry_interval_ms: default_retry_interval_ms(),
            restore_delay_ms: default_restore_delay_ms(),
        }
    }
}
