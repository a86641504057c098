use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::env_value;

fn default_headless() -> bool {
    true
}

fn default_block_content() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    #[serde(default = "default_headless")]
    pub headless: bool,
    /// Chrome/Chromium binary, auto-detected when unset
    pub executable: Option<PathBuf>,
    /// Block trackers, images and fonts while loading provider pages
    #[serde(default = "default_block_content")]
    pub block_content: bool,
}

impl BrowserConfig {
    pub(crate) fn apply_env(&mut self) {
        if let Some(value) = env_value("FERRY_BROWSER_HEADLESS") {
            self.headless = value;
        }
        if let Some(value) = env_value::<String>("FERRY_BROWSER_EXECUTABLE") {
            self.executable = Some(PathBuf::from(value));
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            executable: None,
            block_content: default_block_content(),
        }
    }
}
