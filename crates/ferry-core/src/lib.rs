pub mod archive;
pub mod detector;
pub mod hash;
pub mod language;
pub mod logger;
pub mod store;
pub mod text;
pub mod tokenizer;

pub use archive::{LocalArchive, TranslationArchiver};
pub use detector::{NoopDetector, RegexDetector, SpanDetector};
pub use hash::encoded_hash;
pub use language::{LanguageRecognizer, WhatlangRecognizer};
pub use logger::{LogMetadata, TracingLogger, TranslationLogger};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
