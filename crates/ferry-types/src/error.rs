/// Every way a translation request can fail
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslationError {
    #[error("Passed arguments fail validation.")]
    InvalidArguments,

    #[error("Failed to generate request URL.")]
    FailedToGenerateRequestUrl,

    #[error(
        "Failed to evaluate JavaScript: {}",
        .0.as_deref().unwrap_or("An unknown error occurred.")
    )]
    EvaluateJavaScriptFailed(Option<String>),

    #[error("JavaScript error occurred: {0}")]
    JavaScriptError(String),

    #[error("Malformed translation result.")]
    MalformedTranslationResult,

    #[error("Web view navigation failed: {0}")]
    WebViewNavigationFailed(String),

    #[error("The operation timed out. Please try again later.")]
    TimedOut,

    #[error("{}", .0.as_deref().unwrap_or("An unknown error occurred."))]
    Unknown(Option<String>),
}

impl TranslationError {
    pub fn evaluation_failed() -> Self {
        Self::EvaluateJavaScriptFailed(None)
    }

    pub fn unknown(detail: impl Into<String>) -> Self {
        Self::Unknown(Some(detail.into()))
    }
}
