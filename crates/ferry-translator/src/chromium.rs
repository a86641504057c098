//! [`BrowserEngine`] backed by a headless Chromium driven over the DevTools protocol.
//!
//! Every engine is its own browser process with a throwaway profile directory,
//! so sessions never share cookies or caches.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig as LaunchConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    ClearBrowserCacheParams, ClearBrowserCookiesParams, EnableParams, SetBlockedUrLsParams,
};
use ferry_config::browser::BrowserConfig;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::browser::{BrowserEngine, BrowserError, BrowserFactory, ContentRuleList, NavigationEvent};

pub struct ChromiumFactory {
    config: BrowserConfig,
    /// Parent of the per-engine profile directories
    profile_root: PathBuf,
}

impl ChromiumFactory {
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            profile_root: std::env::temp_dir(),
        }
    }

    pub fn with_profile_root(mut self, profile_root: impl Into<PathBuf>) -> Self {
        self.profile_root = profile_root.into();
        self
    }

    fn launch_config(&self, profile: &Path) -> Result<LaunchConfig, BrowserError> {
        let mut builder = LaunchConfig::builder().user_data_dir(profile);
        if !self.config.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &self.config.executable {
            builder = builder.chrome_executable(executable);
        }
        builder.build().map_err(BrowserError::Launch)
    }
}

#[async_trait]
impl BrowserFactory for ChromiumFactory {
    async fn launch(&self) -> Result<Box<dyn BrowserEngine>, BrowserError> {
        let profile = self.profile_root.join(format!("ferry-{}", Uuid::new_v4()));
        let config = self.launch_config(&profile)?;

        let (mut browser, mut handler) = match Browser::launch(config).await {
            Ok(launched) => launched,
            Err(e) => {
                remove_profile(&profile).await;
                return Err(BrowserError::Launch(e.to_string()));
            }
        };

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("Browser handler stopped: {e}");
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                shutdown(&mut browser).await;
                events.abort();
                remove_profile(&profile).await;
                return Err(BrowserError::Launch(e.to_string()));
            }
        };

        Ok(Box::new(ChromiumEngine {
            browser: Mutex::new(Some(browser)),
            page,
            events,
            profile,
        }))
    }
}

pub struct ChromiumEngine {
    browser: Mutex<Option<Browser>>,
    page: Page,
    events: JoinHandle<()>,
    profile: PathBuf,
}

impl ChromiumEngine {
    async fn current_url(&self) -> NavigationEvent {
        match self.page.url().await {
            Ok(url) => NavigationEvent::Finished {
                url: url.unwrap_or_default(),
            },
            Err(e) => NavigationEvent::Failed(e.to_string()),
        }
    }
}

#[async_trait]
impl BrowserEngine for ChromiumEngine {
    async fn clear_all_state(&self) -> Result<(), BrowserError> {
        self.page
            .execute(ClearBrowserCookiesParams::default())
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;
        self.page
            .execute(ClearBrowserCacheParams::default())
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;
        Ok(())
    }

    async fn apply_content_rules(&self, rules: &[ContentRuleList]) -> Result<(), BrowserError> {
        let urls: Vec<String> = rules
            .iter()
            .flat_map(|rule| rule.block_patterns.iter().map(|pattern| pattern.to_string()))
            .collect();

        self.page
            .execute(EnableParams::default())
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;
        self.page
            .execute(SetBlockedUrLsParams::new(urls))
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;
        Ok(())
    }

    async fn load(&self, url: &str) -> NavigationEvent {
        // Errors before the response committed surface from goto itself
        if let Err(e) = self.page.goto(url).await {
            return NavigationEvent::FailedProvisional(e.to_string());
        }
        self.current_url().await
    }

    async fn wait_for_navigation(&self) -> NavigationEvent {
        if let Err(e) = self.page.wait_for_navigation().await {
            return NavigationEvent::Failed(e.to_string());
        }
        self.current_url().await
    }

    async fn evaluate_script(&self, script: &str) -> Result<Option<String>, BrowserError> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::Evaluation(e.to_string()))?;

        Ok(result.value().and_then(|value| value.as_str()).map(str::to_owned))
    }

    async fn close(&self) {
        if let Some(mut browser) = self.browser.lock().await.take() {
            shutdown(&mut browser).await;
        }
        self.events.abort();
        remove_profile(&self.profile).await;
    }
}

async fn shutdown(browser: &mut Browser) {
    if let Err(e) = browser.close().await {
        tracing::debug!("Failed to close browser: {e}");
    }
    if let Err(e) = browser.wait().await {
        tracing::debug!("Failed to wait for browser exit: {e}");
    }
}

async fn remove_profile(profile: &Path) {
    match tokio::fs::remove_dir_all(profile).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
            tracing::debug!("Failed to remove browser profile: {e}");
        }
        _ => {}
    }
}
