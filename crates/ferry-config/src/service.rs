use serde::{Deserialize, Serialize};

use crate::env_value;

fn default_max_concurrency() -> usize {
    10
}

fn default_confidence_threshold() -> f32 {
    0.8
}

fn default_providers() -> Vec<String> {
    vec!["google".to_string(), "deepl".to_string(), "reverso".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Upper bound of concurrently running translations in a batch
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Confidence at which input is considered to already be in the target language
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    /// Fallback order, first entry is tried first
    #[serde(default = "default_providers")]
    pub providers: Vec<String>,
}

impl ServiceConfig {
    pub(crate) fn apply_env(&mut self) {
        if let Some(value) = env_value("FERRY_MAX_CONCURRENCY") {
            self.max_concurrency = value;
        }
        if let Some(value) = env_value::<String>("FERRY_PROVIDERS") {
            self.providers = value
                .split(',')
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect();
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            confidence_threshold: default_confidence_threshold(),
            providers: default_providers(),
        }
    }
}
