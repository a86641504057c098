pub mod batch;
pub mod browser;
#[cfg(feature = "chromium")]
pub mod chromium;
pub mod context;
pub mod provider;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use browser::{BrowserEngine, BrowserError, BrowserFactory, ContentRuleList, NavigationEvent};
#[cfg(feature = "chromium")]
pub use chromium::{ChromiumEngine, ChromiumFactory};
pub use context::{ContextError, TranslatorContext, TranslatorContextBuilder};
pub use provider::{Extraction, Provider, UnknownProvider};
pub use service::TranslationService;
pub use session::{ProviderSession, SessionState};
