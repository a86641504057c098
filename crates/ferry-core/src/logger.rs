use std::panic::Location;

/// Where a log message came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogMetadata {
    pub sender: &'static str,
    pub file: &'static str,
    pub line: u32,
}

impl LogMetadata {
    /// Captures the caller's file and line
    #[track_caller]
    pub fn here(sender: &'static str) -> Self {
        let location = Location::caller();
        Self {
            sender,
            file: location.file(),
            line: location.line(),
        }
    }
}

/// Host supplied sink for notable events. Must not block.
pub trait TranslationLogger: Send + Sync {
    fn log(&self, message: &str, metadata: LogMetadata);
}

/// Forwards to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl TranslationLogger for TracingLogger {
    fn log(&self, message: &str, metadata: LogMetadata) {
        tracing::info!(
            sender = metadata.sender,
            file = metadata.file,
            line = metadata.line,
            "{message}"
        );
    }
}
