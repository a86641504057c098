//! Capability boundary to the page rendering engine.
//!
//! A session gets exclusive use of one engine for its whole lifetime and closes
//! it when it resolves. Engines are never shared between sessions.

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("{0}")]
    Evaluation(String),

    #[error("Browser protocol error: {0}")]
    Protocol(String),
}

/// Outcome of a page navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    /// Navigation committed and finished loading at `url`
    Finished { url: String },
    /// Navigation failed after it was committed
    Failed(String),
    /// Navigation failed before anything was committed
    FailedProvisional(String),
}

/// Named set of URL patterns to block while loading provider pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRuleList {
    pub name: &'static str,
    /// Wildcard patterns, `*` matches any run of characters
    pub block_patterns: &'static [&'static str],
}

pub const NO_TRACKERS: ContentRuleList = ContentRuleList {
    name: "no-trackers",
    block_patterns: &[
        "*googletagmanager.com/gtm.js*",
        "*google-analytics.com/analytics.js*",
        "*google-analytics.com/gtag/js*",
        "*google-analytics.com/collect*",
        "*stats.g.doubleclick.net/collect*",
        "*doubleclick.net/*",
        "*facebook.com/tr*",
        "*hotjar.com/*",
        "*cdn.segment.com/analytics.js*",
    ],
};

pub const NO_IMAGES: ContentRuleList = ContentRuleList {
    name: "no-images",
    block_patterns: &[
        "*.png*", "*.jpg*", "*.jpeg*", "*.gif*", "*.webp*", "*.svg*", "*.ico*", "*.mp4*",
        "*.webm*",
    ],
};

pub const NO_FONTS: ContentRuleList = ContentRuleList {
    name: "no-fonts",
    block_patterns: &["*.woff*", "*.woff2*", "*.ttf*", "*.otf*"],
};

/// Rules applied to every session when content blocking is enabled
pub const DEFAULT_CONTENT_RULES: [ContentRuleList; 3] = [NO_TRACKERS, NO_IMAGES, NO_FONTS];

/// One isolated page rendering engine
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    /// Drops cookies, caches and other site data
    async fn clear_all_state(&self) -> Result<(), BrowserError>;

    /// Loading speed-up only, failing to apply rules never affects results
    async fn apply_content_rules(&self, _rules: &[ContentRuleList]) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn load(&self, url: &str) -> NavigationEvent;

    /// Waits for a navigation started by the page itself, e.g. after a click
    async fn wait_for_navigation(&self) -> NavigationEvent;

    /// Evaluates `script` in the current page. `Ok(None)` when the completion
    /// value is not a string.
    async fn evaluate_script(&self, script: &str) -> Result<Option<String>, BrowserError>;

    async fn close(&self);
}

/// Creates a fresh engine for each provider session
#[async_trait]
pub trait BrowserFactory: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserEngine>, BrowserError>;
}
