use std::sync::Arc;

use ferry_config::Config;
use ferry_core::{
    FileStore, LanguageRecognizer, LocalArchive, LogMetadata, RegexDetector, SpanDetector,
    TranslationArchiver, TranslationLogger, WhatlangRecognizer,
};

use crate::browser::BrowserFactory;

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("Invalid span detector pattern: {0}")]
    Detector(#[from] regex::Error),
}

/// Collaborators shared by every request of a [`TranslationService`](crate::TranslationService)
pub struct TranslatorContext {
    pub config: Config,
    pub archiver: Arc<dyn TranslationArchiver>,
    pub logger: Option<Arc<dyn TranslationLogger>>,
    pub recognizer: Arc<dyn LanguageRecognizer>,
    pub detector: Arc<dyn SpanDetector>,
    pub browsers: Arc<dyn BrowserFactory>,
}

impl TranslatorContext {
    pub fn builder(browsers: Arc<dyn BrowserFactory>) -> TranslatorContextBuilder {
        TranslatorContextBuilder {
            browsers,
            config: None,
            archiver: None,
            logger: None,
            recognizer: None,
            detector: None,
        }
    }

    /// Fire-and-forget message to the registered logger, if any
    #[track_caller]
    pub(crate) fn log(&self, sender: &'static str, message: &str) {
        if let Some(logger) = &self.logger {
            logger.log(message, LogMetadata::here(sender));
        }
    }
}

pub struct TranslatorContextBuilder {
    browsers: Arc<dyn BrowserFactory>,
    config: Option<Config>,
    archiver: Option<Arc<dyn TranslationArchiver>>,
    logger: Option<Arc<dyn TranslationLogger>>,
    recognizer: Option<Arc<dyn LanguageRecognizer>>,
    detector: Option<Arc<dyn SpanDetector>>,
}

impl TranslatorContextBuilder {
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub fn archiver(mut self, archiver: Arc<dyn TranslationArchiver>) -> Self {
        self.archiver = Some(archiver);
        self
    }

    pub fn logger(mut self, logger: Arc<dyn TranslationLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn recognizer(mut self, recognizer: Arc<dyn LanguageRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn detector(mut self, detector: Arc<dyn SpanDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Fills unset collaborators with the built-in ones. The default archive is
    /// loaded from `config.archive.directory` when persistence is enabled.
    pub async fn build(self) -> Result<TranslatorContext, ContextError> {
        let config = self.config.unwrap_or_default();

        let archiver: Arc<dyn TranslationArchiver> = match self.archiver {
            Some(archiver) => archiver,
            None if config.archive.enabled => {
                let store = Arc::new(FileStore::new(config.archive.directory.clone()));
                Arc::new(LocalArchive::load(store).await)
            }
            None => Arc::new(LocalArchive::in_memory().await),
        };

        let detector: Arc<dyn SpanDetector> = match self.detector {
            Some(detector) => detector,
            None => Arc::new(RegexDetector::new()?),
        };

        Ok(TranslatorContext {
            config,
            archiver,
            logger: self.logger,
            recognizer: self.recognizer.unwrap_or_else(|| Arc::new(WhatlangRecognizer)),
            detector,
            browsers: self.browsers,
        })
    }
}
