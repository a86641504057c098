//! In-memory [`BrowserEngine`] that replays canned navigation and script results.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::browser::{BrowserEngine, BrowserError, BrowserFactory, NavigationEvent};
use crate::provider::{CONSENT_SCRIPT, CONSENT_URL, REVERSO_RESTORE_SCRIPT};

pub type Responder = Arc<dyn Fn(&str) -> Result<Option<String>, BrowserError> + Send + Sync>;

#[derive(Clone)]
pub enum Load {
    Finish,
    /// Lands on the consent page first, then on the requested page once accepted
    Consent,
    Fail(String),
    FailProvisional(String),
    Hang,
}

#[derive(Clone)]
pub struct Behavior {
    pub load: Load,
    pub respond: Responder,
    pub evaluation_delay: Duration,
}

impl Behavior {
    /// Every extraction script yields `output`; there is never a swapped pair to restore
    pub fn translating(output: &str) -> Self {
        let output = output.to_string();
        Self::responding(move |script| {
            if script == REVERSO_RESTORE_SCRIPT {
                Err(BrowserError::Evaluation("No element".into()))
            } else {
                Ok(Some(output.clone()))
            }
        })
    }

    pub fn responding(
        respond: impl Fn(&str) -> Result<Option<String>, BrowserError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            load: Load::Finish,
            respond: Arc::new(respond),
            evaluation_delay: Duration::ZERO,
        }
    }

    pub fn failing(load: Load) -> Self {
        Self {
            load,
            ..Self::translating("")
        }
    }

    pub fn with_load(mut self, load: Load) -> Self {
        self.load = load;
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.evaluation_delay = delay;
        self
    }
}

#[derive(Default)]
pub struct Stats {
    pub launches: AtomicUsize,
    pub closes: AtomicUsize,
    pub evaluations: AtomicUsize,
    pub consent_clicks: AtomicUsize,
    active: AtomicUsize,
    pub peak: AtomicUsize,
    pub loaded: Mutex<Vec<String>>,
}

impl Stats {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn loaded(&self) -> Vec<String> {
        self.loaded.lock().unwrap().clone()
    }

    /// Loaded URLs containing `fragment`
    pub fn loads_of(&self, fragment: &str) -> usize {
        self.loaded().iter().filter(|url| url.contains(fragment)).count()
    }
}

struct Routes {
    default: Behavior,
    /// First route whose pattern occurs in the URL wins
    routes: Vec<(String, Behavior)>,
}

impl Routes {
    fn behavior_for(&self, url: &str) -> &Behavior {
        self.routes
            .iter()
            .find(|(pattern, _)| url.contains(pattern.as_str()))
            .map(|(_, behavior)| behavior)
            .unwrap_or(&self.default)
    }
}

pub struct ScriptedFactory {
    stats: Arc<Stats>,
    routes: Arc<Routes>,
}

impl ScriptedFactory {
    pub fn new(default: Behavior) -> Self {
        Self {
            stats: Arc::default(),
            routes: Arc::new(Routes {
                default,
                routes: Vec::new(),
            }),
        }
    }

    pub fn route(mut self, pattern: &str, behavior: Behavior) -> Self {
        if let Some(routes) = Arc::get_mut(&mut self.routes) {
            routes.routes.push((pattern.to_string(), behavior));
        }
        self
    }

    pub fn stats(&self) -> Arc<Stats> {
        Arc::clone(&self.stats)
    }
}

#[async_trait]
impl BrowserFactory for ScriptedFactory {
    async fn launch(&self) -> Result<Box<dyn BrowserEngine>, BrowserError> {
        self.stats.launches.fetch_add(1, Ordering::SeqCst);
        let active = self.stats.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.peak.fetch_max(active, Ordering::SeqCst);

        Ok(Box::new(ScriptedBrowser {
            stats: Arc::clone(&self.stats),
            routes: Arc::clone(&self.routes),
            url: Mutex::new(String::new()),
        }))
    }
}

pub struct ScriptedBrowser {
    stats: Arc<Stats>,
    routes: Arc<Routes>,
    url: Mutex<String>,
}

impl ScriptedBrowser {
    fn behavior(&self) -> Behavior {
        let url = self.url.lock().unwrap().clone();
        self.routes.behavior_for(&url).clone()
    }
}

#[async_trait]
impl BrowserEngine for ScriptedBrowser {
    async fn clear_all_state(&self) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn load(&self, url: &str) -> NavigationEvent {
        *self.url.lock().unwrap() = url.to_string();
        self.stats.loaded.lock().unwrap().push(url.to_string());

        let load = self.behavior().load;
        match load {
            Load::Finish => NavigationEvent::Finished {
                url: url.to_string(),
            },
            Load::Consent => NavigationEvent::Finished {
                url: format!("{CONSENT_URL}ml?continue=1"),
            },
            Load::Fail(detail) => NavigationEvent::Failed(detail),
            Load::FailProvisional(detail) => NavigationEvent::FailedProvisional(detail),
            Load::Hang => std::future::pending().await,
        }
    }

    async fn wait_for_navigation(&self) -> NavigationEvent {
        NavigationEvent::Finished {
            url: self.url.lock().unwrap().clone(),
        }
    }

    async fn evaluate_script(&self, script: &str) -> Result<Option<String>, BrowserError> {
        if script == CONSENT_SCRIPT {
            self.stats.consent_clicks.fetch_add(1, Ordering::SeqCst);
            return Ok(None);
        }

        self.stats.evaluations.fetch_add(1, Ordering::SeqCst);
        let behavior = self.behavior();
        if !behavior.evaluation_delay.is_zero() {
            tokio::time::sleep(behavior.evaluation_delay).await;
        }
        (behavior.respond)(script)
    }

    async fn close(&self) {
        self.stats.active.fetch_sub(1, Ordering::SeqCst);
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
    }
}
