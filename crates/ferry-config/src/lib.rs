use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use self::archive::ArchiveConfig;
use self::browser::BrowserConfig;
use self::service::ServiceConfig;
use self::session::SessionConfig;

pub mod archive;
pub mod browser;
pub mod service;
pub mod session;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
    pub service: ServiceConfig,
    pub archive: ArchiveConfig,
    pub browser: BrowserConfig,

    /// Emit logs as JSON lines instead of the human readable format
    pub json_logs: bool,
}

impl Config {
    /// Defaults with `FERRY_*` environment overrides applied
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    pub fn apply_env(&mut self) {
        self.session.apply_env();
        self.service.apply_env();
        self.archive.apply_env();
        self.browser.apply_env();

        if let Some(json_logs) = env_value("FERRY_JSON_LOGS") {
            self.json_logs = json_logs;
        }
    }
}

/// Reads and parses an environment variable, ignoring unset or unparsable values
pub(crate) fn env_value<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
