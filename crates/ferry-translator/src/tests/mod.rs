mod scripted;
mod service_tests;

use std::sync::Arc;

use ferry_config::Config;
use ferry_core::{LanguageRecognizer, LocalArchive};
use ferry_types::LanguagePair;

use crate::context::TranslatorContext;
use crate::service::TranslationService;

use self::scripted::ScriptedFactory;

/// Reports the same confidence for every text
struct FixedRecognizer(f32);

impl LanguageRecognizer for FixedRecognizer {
    fn match_confidence(&self, _text: &str, _language_code: &str) -> f32 {
        self.0
    }
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.session.timeout_ms = 300;
    config.session.evaluation_threshold_ms = 150;
    config.session.retry_interval_ms = 5;
    config.session.restore_delay_ms = 5;
    config.archive.enabled = false;
    config
}

fn pair(from: &str, to: &str) -> LanguagePair {
    LanguagePair::new(from, to)
}

struct Harness {
    service: TranslationService,
    archive: Arc<LocalArchive>,
}

async fn harness_with(factory: ScriptedFactory, config: Config) -> Harness {
    let archive = Arc::new(LocalArchive::in_memory().await);
    let context = TranslatorContext::builder(Arc::new(factory))
        .config(config)
        .archiver(archive.clone())
        .recognizer(Arc::new(FixedRecognizer(0.0)))
        .build()
        .await
        .unwrap();

    Harness {
        service: TranslationService::new(Arc::new(context)),
        archive,
    }
}

async fn harness(factory: ScriptedFactory) -> Harness {
    harness_with(factory, test_config()).await
}
