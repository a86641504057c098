//! One provider, one browser engine, one translation attempt.
//!
//! ```text
//! Idle -> RequestBuilt -> Loading -> AwaitingExtraction -> Evaluating
//!                                                            |  ^
//!                                                            v  |
//!                        Succeeded | Failed | TimedOut <- Retrying
//! ```
//!
//! The absolute deadline covers loading. Once navigation finished, extraction may
//! keep retrying until the evaluation threshold has elapsed. Both are checked at
//! transitions; a script evaluation that is already running is never interrupted
//! by them. The engine is released exactly once, when a terminal state is reached
//! or, failing that, when the session is dropped.

use std::time::Duration;

use ferry_config::session::SessionConfig;
use ferry_types::{LanguagePair, Translation, TranslationError, TranslationInput};
use tokio::time::{Instant, sleep, sleep_until, timeout};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::browser::{BrowserEngine, BrowserError, DEFAULT_CONTENT_RULES, NavigationEvent};
use crate::context::TranslatorContext;
use crate::provider::{CONSENT_SCRIPT, CONSENT_URL, Extraction, Provider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    RequestBuilt(Url),
    Loading(Url),
    AwaitingExtraction,
    Evaluating {
        use_alternate: bool,
    },
    Retrying {
        error: TranslationError,
        use_alternate: bool,
    },
    Succeeded(String),
    Failed(TranslationError),
    TimedOut,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::RequestBuilt(_) => "request_built",
            SessionState::Loading(_) => "loading",
            SessionState::AwaitingExtraction => "awaiting_extraction",
            SessionState::Evaluating { .. } => "evaluating",
            SessionState::Retrying { .. } => "retrying",
            SessionState::Succeeded(_) => "succeeded",
            SessionState::Failed(_) => "failed",
            SessionState::TimedOut => "timed_out",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Succeeded(_) | SessionState::Failed(_) | SessionState::TimedOut
        )
    }
}

pub struct ProviderSession<'a> {
    provider: Provider,
    context: &'a TranslatorContext,
    cancel: &'a CancellationToken,
    input: TranslationInput,
    language_pair: LanguagePair,
    engine: EngineGuard,
    deadline: Option<Instant>,
    navigation_finished: Option<Instant>,
}

impl<'a> ProviderSession<'a> {
    pub fn new(
        provider: Provider,
        context: &'a TranslatorContext,
        cancel: &'a CancellationToken,
        input: TranslationInput,
        language_pair: LanguagePair,
    ) -> Self {
        Self {
            provider,
            context,
            cancel,
            input,
            language_pair,
            engine: EngineGuard::default(),
            deadline: None,
            navigation_finished: None,
        }
    }

    /// Drives the session to a terminal state
    pub async fn run(self) -> Result<Translation, TranslationError> {
        let span = tracing::debug_span!(
            "session",
            id = %Uuid::new_v4(),
            provider = %self.provider
        );
        self.drive().instrument(span).await
    }

    async fn drive(mut self) -> Result<Translation, TranslationError> {
        let mut state = SessionState::Idle;

        while !state.is_terminal() {
            let next = self.step(state).await;
            tracing::debug!(state = next.name(), "session transition");
            state = next;
        }

        self.teardown().await;

        match state {
            SessionState::Succeeded(output) => Ok(Translation::new(
                self.input,
                output,
                self.language_pair,
            )),
            SessionState::Failed(error) => Err(error),
            _ => Err(TranslationError::TimedOut),
        }
    }

    async fn step(&mut self, state: SessionState) -> SessionState {
        match state {
            SessionState::Idle => {
                match self.provider.request_url(self.input.value(), &self.language_pair) {
                    Some(url) => SessionState::RequestBuilt(url),
                    None => SessionState::Failed(TranslationError::FailedToGenerateRequestUrl),
                }
            }
            SessionState::RequestBuilt(url) => self.prepare(url).await,
            SessionState::Loading(url) => self.load(&url).await,
            SessionState::AwaitingExtraction => {
                self.navigation_finished = Some(Instant::now());
                self.deadline = None;
                SessionState::Evaluating { use_alternate: false }
            }
            SessionState::Evaluating { use_alternate } => self.evaluate(use_alternate).await,
            SessionState::Retrying { error, use_alternate } => {
                self.retry_or_fail(error, use_alternate).await
            }
            terminal => terminal,
        }
    }

    /// Acquires an isolated engine and arms the absolute deadline
    async fn prepare(&mut self, url: Url) -> SessionState {
        match self.context.browsers.launch().await {
            Ok(engine) => self.engine.hold(engine),
            Err(e) => return SessionState::Failed(TranslationError::unknown(e.to_string())),
        }
        let Some(engine) = self.engine.get() else {
            return self.missing_values();
        };

        if let Err(e) = engine.clear_all_state().await {
            tracing::warn!("Failed to clear browser state: {e}");
        }
        if self.context.config.browser.block_content {
            if let Err(e) = engine.apply_content_rules(&DEFAULT_CONTENT_RULES).await {
                self.context
                    .log("ProviderSession", &format!("Failed to apply content rules: {e}"));
            }
        }

        self.deadline = Some(deadline_after(self.config().timeout()));
        SessionState::Loading(url)
    }

    async fn load(&self, url: &Url) -> SessionState {
        let (Some(engine), Some(deadline)) = (self.engine.get(), self.deadline) else {
            return self.missing_values();
        };

        tokio::select! {
            event = Self::navigate(engine, url) => match event {
                NavigationEvent::Finished { .. } => {
                    self.context.log("ProviderSession", "Web view finished navigation.");
                    SessionState::AwaitingExtraction
                }
                NavigationEvent::Failed(detail) => {
                    self.context.log(
                        "ProviderSession",
                        &format!("Web view failed navigation: {detail}"),
                    );
                    SessionState::Failed(TranslationError::WebViewNavigationFailed(detail))
                }
                NavigationEvent::FailedProvisional(detail) => {
                    self.context.log(
                        "ProviderSession",
                        &format!("Web view failed provisional navigation: {detail}"),
                    );
                    SessionState::Failed(TranslationError::WebViewNavigationFailed(detail))
                }
            },
            _ = sleep_until(deadline) => SessionState::TimedOut,
            _ = self.cancel.cancelled() => SessionState::Failed(cancelled()),
        }
    }

    /// Loads `url`, clicking through consent interstitials on the way
    async fn navigate(engine: &dyn BrowserEngine, url: &Url) -> NavigationEvent {
        let mut event = engine.load(url.as_str()).await;

        loop {
            match event {
                NavigationEvent::Finished { url } if url.starts_with(CONSENT_URL) => {
                    tracing::debug!("Accepting consent page");
                    if let Err(e) = engine.evaluate_script(CONSENT_SCRIPT).await {
                        return NavigationEvent::Failed(e.to_string());
                    }
                    event = engine.wait_for_navigation().await;
                }
                other => return other,
            }
        }
    }

    async fn evaluate(&self, use_alternate: bool) -> SessionState {
        let Some(engine) = self.engine.get() else {
            return self.missing_values();
        };

        if let Some(restore) = self.provider.restore_script() {
            if engine.evaluate_script(restore).await.is_ok() {
                tracing::debug!("Restored language pair");
                sleep(self.config().restore_delay()).await;
                return SessionState::Retrying {
                    error: TranslationError::evaluation_failed(),
                    use_alternate: !use_alternate,
                };
            }
        }

        let script = self.provider.extraction_script(use_alternate);
        let threshold = self.config().evaluation_threshold();
        let evaluated = timeout(threshold, engine.evaluate_script(script))
            .await
            .unwrap_or_else(|_| {
                Err(BrowserError::Evaluation(
                    "Script evaluation timed out.".to_string(),
                ))
            });

        match self.provider.interpret(evaluated, use_alternate, self.input.value()) {
            Extraction::Output(output) => SessionState::Succeeded(output),
            Extraction::Retry { error, use_alternate } => {
                tracing::debug!("Extraction attempt failed: {error}");
                SessionState::Retrying { error, use_alternate }
            }
        }
    }

    async fn retry_or_fail(&self, error: TranslationError, use_alternate: bool) -> SessionState {
        if self.reached_evaluation_threshold() || self.cancel.is_cancelled() {
            return SessionState::Failed(error);
        }

        tokio::select! {
            _ = sleep(self.config().retry_interval()) => SessionState::Evaluating { use_alternate },
            _ = self.cancel.cancelled() => SessionState::Failed(error),
        }
    }

    fn reached_evaluation_threshold(&self) -> bool {
        self.navigation_finished
            .is_some_and(|finished| finished.elapsed() >= self.config().evaluation_threshold())
    }

    fn missing_values(&self) -> SessionState {
        SessionState::Failed(TranslationError::EvaluateJavaScriptFailed(Some(
            "Missing required parameters.".to_string(),
        )))
    }

    fn config(&self) -> &SessionConfig {
        &self.context.config.session
    }

    async fn teardown(&mut self) {
        self.deadline = None;
        self.navigation_finished = None;
        self.engine.release().await;
    }
}

pub(crate) fn cancelled() -> TranslationError {
    TranslationError::unknown("Translation was cancelled.")
}

/// `now + duration`, saturating to roughly thirty years ahead
fn deadline_after(duration: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(duration)
        .unwrap_or_else(|| now + Duration::from_secs(86400 * 365 * 30))
}

/// Owns the session's engine. Dropped without [`EngineGuard::release`] (the
/// session future was dropped or panicked), it closes the engine on the runtime.
#[derive(Default)]
struct EngineGuard {
    engine: Option<Box<dyn BrowserEngine>>,
}

impl EngineGuard {
    fn hold(&mut self, engine: Box<dyn BrowserEngine>) {
        self.engine = Some(engine);
    }

    fn get(&self) -> Option<&dyn BrowserEngine> {
        self.engine.as_deref()
    }

    async fn release(&mut self) {
        if let Some(engine) = self.engine.take() {
            engine.close().await;
        }
    }
}

impl Drop for EngineGuard {
    fn drop(&mut self) {
        let Some(engine) = self.engine.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::debug!("Session dropped before teardown, closing engine");
                handle.spawn(async move { engine.close().await });
            }
            Err(_) => tracing::warn!("Session dropped outside a runtime, engine not closed"),
        }
    }
}
