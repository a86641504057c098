use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::env_value;

fn default_enabled() -> bool {
    true
}

fn default_directory() -> PathBuf {
    PathBuf::from(".ferry")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Persist translations to disk; when false the archive only lives in memory
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

impl ArchiveConfig {
    pub(crate) fn apply_env(&mut self) {
        if let Some(value) = env_value::<String>("FERRY_ARCHIVE_DIR") {
            self.directory = PathBuf::from(value);
        }
        if let Some(value) = env_value("FERRY_ARCHIVE_ENABLED") {
            self.enabled = value;
        }
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            directory: default_directory(),
        }
    }
}
