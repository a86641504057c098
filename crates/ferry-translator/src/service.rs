//! Fallback orchestration over the configured providers.

use std::sync::Arc;

use ferry_core::detector::with_delimited_spans;
use ferry_core::encoded_hash;
use ferry_core::text::{
    capitalized_relative_to, has_letters, normalized, trim_trailing_whitespace_and_newlines,
};
use ferry_core::tokenizer::{
    MARKER, Tokenized, restore, strip_delimiters, strip_processing_characters, tokenize,
};
use ferry_types::{LanguagePair, Translation, TranslationError, TranslationInput, Validatable};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::context::TranslatorContext;
use crate::provider::Provider;
use crate::session::{ProviderSession, cancelled};

/// Malformed cache hits evicted per request before the cache is treated as a miss
const MAX_CACHE_EVICTIONS: usize = 4;

/// Entry point for single and batch translations
#[derive(Clone)]
pub struct TranslationService {
    context: Arc<TranslatorContext>,
    providers: Vec<Provider>,
}

impl TranslationService {
    /// Providers are taken from `service.providers`; unknown names are skipped
    /// and an empty list falls back to the default priority.
    pub fn new(context: Arc<TranslatorContext>) -> Self {
        let mut providers = Vec::new();
        for name in &context.config.service.providers {
            match name.parse::<Provider>() {
                Ok(provider) if !providers.contains(&provider) => providers.push(provider),
                Ok(_) => {}
                Err(e) => tracing::warn!("Skipping provider: {e}"),
            }
        }
        if providers.is_empty() {
            providers = Provider::PRIORITY.to_vec();
        }

        Self { context, providers }
    }

    pub fn context(&self) -> &TranslatorContext {
        &self.context
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub async fn translate(
        &self,
        input: TranslationInput,
        language_pair: LanguagePair,
    ) -> Result<Translation, TranslationError> {
        self.translate_cancellable(input, language_pair, None, &CancellationToken::new())
            .await
    }

    /// Translates with `provider` only, without falling back to the others
    pub async fn translate_with(
        &self,
        input: TranslationInput,
        language_pair: LanguagePair,
        provider: Provider,
    ) -> Result<Translation, TranslationError> {
        self.translate_cancellable(input, language_pair, Some(provider), &CancellationToken::new())
            .await
    }

    pub(crate) async fn translate_cancellable(
        &self,
        input: TranslationInput,
        language_pair: LanguagePair,
        provider: Option<Provider>,
        cancel: &CancellationToken,
    ) -> Result<Translation, TranslationError> {
        let span = tracing::info_span!("translate", pair = %language_pair);
        self.orchestrate(input, language_pair, provider, cancel)
            .instrument(span)
            .await
    }

    async fn orchestrate(
        &self,
        input: TranslationInput,
        language_pair: LanguagePair,
        provider: Option<Provider>,
        cancel: &CancellationToken,
    ) -> Result<Translation, TranslationError> {
        if !input.is_well_formed() || !language_pair.is_well_formed() {
            return Err(TranslationError::InvalidArguments);
        }

        let input = with_delimited_spans(&input, self.context.detector.as_ref());
        let tokenized = tokenize(input.value());

        if self.is_already_translated(&input, &tokenized, &language_pair) {
            tracing::debug!("Returning input as is");
            let output = strip_delimiters(input.value());
            return Ok(Translation::new(input, output, language_pair));
        }

        if let Some(cached) = self.cached(&input, &language_pair).await {
            tracing::debug!("Returning archived translation");
            return Ok(Translation::new(input, cached.output, language_pair));
        }

        let providers = match provider {
            Some(provider) => vec![provider],
            None => self.providers.clone(),
        };
        let masked =
            TranslationInput::new(trim_trailing_whitespace_and_newlines(&tokenized.processed));

        let mut last_error = TranslationError::unknown("No provider was attempted.");
        for (position, provider) in providers.iter().copied().enumerate() {
            if cancel.is_cancelled() {
                return Err(last_error);
            }
            let is_last = position + 1 == providers.len();

            let attempt = ProviderSession::new(
                provider,
                &self.context,
                cancel,
                masked.clone(),
                language_pair.clone(),
            )
            .run()
            .await
            .and_then(|result| self.finish(&input, &tokenized, &language_pair, &result.output));

            match attempt {
                Ok(translation) if !is_last && is_echo(&translation) => {
                    self.context.log(
                        "TranslationService",
                        &format!("{provider} returned the input untranslated."),
                    );
                    last_error = TranslationError::evaluation_failed();
                }
                // Results completing after cancellation are discarded, never archived
                Ok(_) if cancel.is_cancelled() => return Err(cancelled()),
                Ok(translation) => {
                    tracing::info!(provider = %provider, "Translated");
                    self.context.archiver.add(translation.clone()).await;
                    return Ok(translation);
                }
                Err(e) => {
                    self.context.log("TranslationService", &format!("{provider} failed: {e}"));
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    /// No letters to translate, an idempotent pair, or text confidently in the target language
    fn is_already_translated(
        &self,
        input: &TranslationInput,
        tokenized: &Tokenized,
        language_pair: &LanguagePair,
    ) -> bool {
        if !has_letters(&strip_processing_characters(&tokenized.processed)) {
            return true;
        }
        if language_pair.is_idempotent() {
            return true;
        }

        let text = strip_delimiters(input.value());
        let confidence = self.context.recognizer.match_confidence(&text, &language_pair.to);
        confidence >= self.context.config.service.confidence_threshold
    }

    /// Archived translation for the value, or for the value without trailing whitespace.
    /// Malformed entries are evicted and the lookup starts over.
    async fn cached(
        &self,
        input: &TranslationInput,
        language_pair: &LanguagePair,
    ) -> Option<Translation> {
        let value = input.value();
        let hashes = [
            encoded_hash(value),
            encoded_hash(trim_trailing_whitespace_and_newlines(value)),
        ];

        for _ in 0..MAX_CACHE_EVICTIONS {
            let mut hit = None;
            for hash in &hashes {
                if let Some(translation) = self.context.archiver.get(hash, language_pair).await {
                    hit = Some((hash, translation));
                    break;
                }
            }

            match hit {
                None => return None,
                Some((_, translation)) if translation.is_well_formed() => return Some(translation),
                Some((hash, _)) => {
                    tracing::warn!("Evicting malformed archived translation");
                    self.context.archiver.remove(hash, language_pair).await;
                }
            }
        }

        None
    }

    /// Splices tokens back into a provider's output and validates the result
    fn finish(
        &self,
        input: &TranslationInput,
        tokenized: &Tokenized,
        language_pair: &LanguagePair,
        output: &str,
    ) -> Result<Translation, TranslationError> {
        if !tokenized.tokens.is_empty() && !output.contains(MARKER) {
            return Err(TranslationError::MalformedTranslationResult);
        }

        let restored = restore(output, &tokenized.tokens);
        let stripped = strip_processing_characters(&restored);
        let trimmed = trim_trailing_whitespace_and_newlines(&stripped);
        let output = capitalized_relative_to(trimmed, &input.original);

        let translation = Translation::new(input.clone(), output, language_pair.clone());
        if !translation.is_well_formed() {
            return Err(TranslationError::MalformedTranslationResult);
        }

        Ok(translation)
    }
}

fn is_echo(translation: &Translation) -> bool {
    normalized(&translation.output) == normalized(&strip_delimiters(translation.input.value()))
}
