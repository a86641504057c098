use std::sync::Arc;

use ferry_core::{TranslationArchiver, encoded_hash};
use ferry_types::{Translation, TranslationError, TranslationInput};

use super::scripted::{Behavior, Load, ScriptedFactory};
use super::{FixedRecognizer, harness, harness_with, pair, test_config};
use crate::context::TranslatorContext;
use crate::provider::Provider;
use crate::service::TranslationService;

#[tokio::test]
async fn idempotent_pair_echoes_input_without_providers() {
    let factory = ScriptedFactory::new(Behavior::translating("Bonjour"));
    let stats = factory.stats();
    let harness = harness(factory).await;

    let translation = harness
        .service
        .translate(TranslationInput::new("Hello"), pair("en", "en"))
        .await
        .unwrap();

    assert_eq!(translation.output, "Hello");
    assert_eq!(stats.launches(), 0);
}

#[tokio::test]
async fn text_without_letters_is_returned_as_is() {
    let factory = ScriptedFactory::new(Behavior::translating("Bonjour"));
    let stats = factory.stats();
    let harness = harness(factory).await;

    let digits = harness
        .service
        .translate(TranslationInput::new("12 345"), pair("en", "fr"))
        .await
        .unwrap();
    let link = harness
        .service
        .translate(TranslationInput::new("https://example.com"), pair("en", "fr"))
        .await
        .unwrap();

    assert_eq!(digits.output, "12 345");
    assert_eq!(link.output, "https://example.com");
    assert_eq!(stats.launches(), 0);
}

#[tokio::test]
async fn confident_target_language_skips_providers() {
    let factory = ScriptedFactory::new(Behavior::translating("Bonjour"));
    let stats = factory.stats();
    let context = TranslatorContext::builder(Arc::new(factory))
        .config(test_config())
        .recognizer(Arc::new(FixedRecognizer(0.9)))
        .build()
        .await
        .unwrap();
    let service = TranslationService::new(Arc::new(context));

    let translation = service
        .translate(TranslationInput::new("Bonjour tout le monde"), pair("en", "fr"))
        .await
        .unwrap();

    assert_eq!(translation.output, "Bonjour tout le monde");
    assert_eq!(stats.launches(), 0);
}

#[tokio::test]
async fn malformed_arguments_are_rejected() {
    let factory = ScriptedFactory::new(Behavior::translating("Bonjour"));
    let stats = factory.stats();
    let harness = harness(factory).await;

    let empty = harness
        .service
        .translate(TranslationInput::new(""), pair("en", "fr"))
        .await;
    let blank = harness
        .service
        .translate(TranslationInput::new(" \n"), pair("en", "fr"))
        .await;
    let long_codes = harness
        .service
        .translate(TranslationInput::new("Hello"), pair("eng", "us"))
        .await;

    assert_eq!(empty, Err(TranslationError::InvalidArguments));
    assert_eq!(blank, Err(TranslationError::InvalidArguments));
    assert_eq!(long_codes, Err(TranslationError::InvalidArguments));
    assert_eq!(stats.launches(), 0);
}

#[tokio::test]
async fn archived_translation_is_served_without_providers() {
    let factory = ScriptedFactory::new(Behavior::translating("Salut"));
    let stats = factory.stats();
    let harness = harness(factory).await;
    harness
        .archive
        .add(Translation::new(TranslationInput::new("Hello"), "Bonjour", pair("en", "fr")))
        .await;

    let exact = harness
        .service
        .translate(TranslationInput::new("Hello"), pair("en", "fr"))
        .await
        .unwrap();
    let trailing_newline = harness
        .service
        .translate(TranslationInput::new("Hello\n"), pair("en", "fr"))
        .await
        .unwrap();

    assert_eq!(exact.output, "Bonjour");
    assert_eq!(trailing_newline.output, "Bonjour");
    assert_eq!(stats.launches(), 0);
}

#[tokio::test]
async fn malformed_archive_entry_is_evicted_and_replaced() {
    let factory = ScriptedFactory::new(Behavior::translating("Bonjour"));
    let stats = factory.stats();
    let harness = harness(factory).await;
    harness
        .archive
        .add(Translation::new(TranslationInput::new("Hello"), "  ", pair("en", "fr")))
        .await;

    let translation = harness
        .service
        .translate(TranslationInput::new("Hello"), pair("en", "fr"))
        .await
        .unwrap();

    assert_eq!(translation.output, "Bonjour");
    assert_eq!(stats.launches(), 1);
    assert_eq!(harness.archive.len().await, 1);
    let archived = harness
        .archive
        .get(&encoded_hash("Hello"), &pair("en", "fr"))
        .await
        .unwrap();
    assert_eq!(archived.output, "Bonjour");
}

#[tokio::test]
async fn failing_provider_falls_back_to_next() {
    let factory = ScriptedFactory::new(Behavior::translating("Bonjour"))
        .route("google", Behavior::failing(Load::Fail("net::ERR_FAILED".into())));
    let stats = factory.stats();
    let harness = harness(factory).await;

    let translation = harness
        .service
        .translate(TranslationInput::new("Hello"), pair("en", "fr"))
        .await
        .unwrap();

    assert_eq!(translation.output, "Bonjour");
    assert_eq!(stats.loads_of("translate.google.com"), 1);
    assert_eq!(stats.loads_of("deepl.com"), 1);
    assert_eq!(stats.loads_of("reverso.net"), 0);
    assert_eq!(stats.closes(), stats.launches());
    assert!(
        harness
            .archive
            .get(&encoded_hash("Hello"), &pair("en", "fr"))
            .await
            .is_some()
    );
}

#[tokio::test]
async fn echoed_output_counts_as_failure() {
    let factory = ScriptedFactory::new(Behavior::translating("Bonjour"))
        .route("google", Behavior::translating("hello"));
    let harness = harness(factory).await;

    let translation = harness
        .service
        .translate(TranslationInput::new("Hello"), pair("en", "fr"))
        .await
        .unwrap();

    assert_eq!(translation.output, "Bonjour");
}

#[tokio::test]
async fn exhausted_providers_surface_last_error_and_leave_archive_untouched() {
    let factory = ScriptedFactory::new(Behavior::failing(Load::Fail("reverso down".into())))
        .route("google", Behavior::failing(Load::Fail("google down".into())))
        .route("deepl", Behavior::failing(Load::FailProvisional("deepl down".into())));
    let stats = factory.stats();
    let harness = harness(factory).await;

    let result = harness
        .service
        .translate(TranslationInput::new("Hello"), pair("en", "fr"))
        .await;

    assert_eq!(
        result,
        Err(TranslationError::WebViewNavigationFailed("reverso down".into()))
    );
    assert_eq!(stats.launches(), 3);
    assert_eq!(stats.closes(), 3);
    assert!(harness.archive.is_empty().await);
}

#[tokio::test]
async fn forced_provider_does_not_fall_back() {
    let factory = ScriptedFactory::new(Behavior::translating("Bonjour"))
        .route("deepl", Behavior::failing(Load::Fail("deepl down".into())));
    let stats = factory.stats();
    let harness = harness(factory).await;

    let result = harness
        .service
        .translate_with(TranslationInput::new("Hello"), pair("en", "fr"), Provider::DeepL)
        .await;

    assert_eq!(
        result,
        Err(TranslationError::WebViewNavigationFailed("deepl down".into()))
    );
    assert_eq!(stats.launches(), 1);
    assert_eq!(stats.loads_of("translate.google.com"), 0);
}

#[tokio::test]
async fn last_provider_output_is_accepted_even_when_echoed() {
    let factory = ScriptedFactory::new(Behavior::translating("Hello"));
    let harness = harness(factory).await;

    let translation = harness
        .service
        .translate_with(TranslationInput::new("Hello"), pair("en", "fr"), Provider::Google)
        .await
        .unwrap();

    assert_eq!(translation.output, "Hello");
}

#[tokio::test]
async fn protected_spans_survive_translation() {
    let factory = ScriptedFactory::new(Behavior::translating("Visitez ⁂ maintenant"));
    let stats = factory.stats();
    let harness = harness(factory).await;

    let translation = harness
        .service
        .translate(TranslationInput::new("Visit https://example.com now"), pair("en", "fr"))
        .await
        .unwrap();

    assert_eq!(translation.output, "Visitez https://example.com maintenant");
    assert_eq!(translation.input.original, "Visit https://example.com now");
    assert_eq!(stats.loads_of("example.com"), 0);
}

#[tokio::test]
async fn lost_markers_are_malformed() {
    let factory = ScriptedFactory::new(Behavior::translating("Visitez maintenant"));
    let harness = harness(factory).await;

    let result = harness
        .service
        .translate(TranslationInput::new("Visit https://example.com now"), pair("en", "fr"))
        .await;

    assert_eq!(result, Err(TranslationError::MalformedTranslationResult));
    assert!(harness.archive.is_empty().await);
}

#[tokio::test]
async fn output_is_trimmed_and_capitalized_like_input() {
    let factory = ScriptedFactory::new(Behavior::translating("bonjour le monde\n\n"));
    let harness = harness(factory).await;

    let translation = harness
        .service
        .translate(TranslationInput::new("Hello world"), pair("en", "fr"))
        .await
        .unwrap();

    assert_eq!(translation.output, "Bonjour le monde");
}

#[tokio::test]
async fn providers_follow_configured_order() {
    let mut config = test_config();
    config.service.providers = vec![
        "reverso".into(),
        "bogus".into(),
        "google".into(),
        "reverso".into(),
    ];
    let configured = harness_with(ScriptedFactory::new(Behavior::translating("x")), config).await;

    let mut config = test_config();
    config.service.providers = Vec::new();
    let defaulted = harness_with(ScriptedFactory::new(Behavior::translating("x")), config).await;

    assert_eq!(
        configured.service.providers(),
        &[Provider::Reverso, Provider::Google]
    );
    assert_eq!(defaulted.service.providers(), &Provider::PRIORITY);
}

#[tokio::test]
async fn enabled_archive_is_written_to_configured_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config();
    config.archive.enabled = true;
    config.archive.directory = dir.path().to_path_buf();
    let context = TranslatorContext::builder(Arc::new(ScriptedFactory::new(Behavior::translating(
        "Bonjour",
    ))))
    .config(config)
    .recognizer(Arc::new(FixedRecognizer(0.0)))
    .build()
    .await
    .unwrap();
    let service = TranslationService::new(Arc::new(context));

    service
        .translate(TranslationInput::new("Hello"), pair("en", "fr"))
        .await
        .unwrap();

    let stored = std::fs::read_to_string(dir.path().join("translationArchive.json")).unwrap();
    let translations: Vec<Translation> = serde_json::from_str(&stored).unwrap();
    assert_eq!(translations.len(), 1);
    assert_eq!(translations[0].output, "Bonjour");
}
