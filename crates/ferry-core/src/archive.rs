use std::sync::Arc;

use async_trait::async_trait;
use ferry_types::{LanguagePair, Translation};
use tokio::sync::RwLock;

use crate::hash::encoded_hash;
use crate::store::{KeyValueStore, MemoryStore, StoreError};

/// Key the whole archive is stored under
pub const ARCHIVE_KEY: &str = "translationArchive";

/// Cache of finished translations.
///
/// Entries are matched on the hash of the input value and the *target* language
/// only, so the same text translated from different sources into one target is
/// treated as a single entry.
#[async_trait]
pub trait TranslationArchiver: Send + Sync {
    /// Inserts `translation`, replacing any entry for the same input and language pair
    async fn add(&self, translation: Translation);

    async fn get(&self, input_hash: &str, language_pair: &LanguagePair) -> Option<Translation>;

    async fn remove(&self, input_hash: &str, language_pair: &LanguagePair);

    async fn clear(&self);
}

struct ArchivedEntry {
    input_hash: String,
    translation: Translation,
}

impl ArchivedEntry {
    fn new(translation: Translation) -> Self {
        Self {
            input_hash: encoded_hash(translation.input.value()),
            translation,
        }
    }

    fn matches(&self, input_hash: &str, language_pair: &LanguagePair) -> bool {
        self.input_hash == input_hash && self.translation.language_pair.to == language_pair.to
    }
}

/// Archive held in memory and mirrored to a [`KeyValueStore`] as one JSON document
pub struct LocalArchive {
    store: Arc<dyn KeyValueStore>,
    entries: RwLock<Vec<ArchivedEntry>>,
}

impl LocalArchive {
    /// Loads the stored archive. Unreadable data is logged and replaced by an empty archive.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = match Self::read(store.as_ref()).await {
            Ok(translations) => translations.into_iter().map(ArchivedEntry::new).collect(),
            Err(e) => {
                tracing::warn!("Discarding unreadable translation archive: {e}");
                Vec::new()
            }
        };

        Self {
            store,
            entries: RwLock::new(entries),
        }
    }

    pub async fn in_memory() -> Self {
        Self::load(Arc::new(MemoryStore::new())).await
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn read(store: &dyn KeyValueStore) -> Result<Vec<Translation>, StoreError> {
        match store.get(ARCHIVE_KEY).await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    async fn persist(&self, entries: &[ArchivedEntry]) {
        let translations: Vec<&Translation> = entries.iter().map(|e| &e.translation).collect();
        let result = match serde_json::to_vec(&translations) {
            Ok(bytes) => self.store.set(ARCHIVE_KEY, bytes).await,
            Err(e) => Err(e.into()),
        };

        if let Err(e) = result {
            tracing::warn!("Failed to persist translation archive: {e}");
        }
    }
}

#[async_trait]
impl TranslationArchiver for LocalArchive {
    async fn add(&self, translation: Translation) {
        let mut entries = self.entries.write().await;
        entries.retain(|entry| {
            entry.translation.input != translation.input
                || entry.translation.language_pair != translation.language_pair
        });
        entries.push(ArchivedEntry::new(translation));
        self.persist(&entries).await;
    }

    async fn get(&self, input_hash: &str, language_pair: &LanguagePair) -> Option<Translation> {
        self.entries
            .read()
            .await
            .iter()
            .find(|entry| entry.matches(input_hash, language_pair))
            .map(|entry| entry.translation.clone())
    }

    async fn remove(&self, input_hash: &str, language_pair: &LanguagePair) {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|entry| !entry.matches(input_hash, language_pair));

        if entries.len() != before {
            self.persist(&entries).await;
        }
    }

    async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
        if let Err(e) = self.store.remove(ARCHIVE_KEY).await {
            tracing::warn!("Failed to clear translation archive: {e}");
        }
    }
}
