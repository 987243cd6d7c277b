//! Write-once content cache.
//!
//! Summaries are content-hash-addressed and immutable once written:
//! there is no update path, so concurrent writers need no coordination
//! beyond first-write-wins. The cache is consulted by `(conversation,
//! url)` before fetching and by content hash after extraction. It is
//! strictly an optimization; every failure degrades to recomputing.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::error::CacheError;

/// The persisted summary record, also the shape handed to the durable
/// storage collaborator.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SummaryRecord {
    pub url: String,
    pub title: Option<String>,
    pub summary_text: String,
    pub raw_content_snapshot: String,
    pub content_hash: String,
    pub conversation_scope_id: String,
    pub created_at: OffsetDateTime,
}

/// Cache boundary. Entries are immutable once inserted.
#[async_trait]
pub trait ContentCache: Send + Sync {
    /// Looks up a summary by conversation scope and URL.
    async fn get_by_url(&self, conversation_scope_id: &str, url: &str) -> Result<Option<SummaryRecord>, CacheError>;

    /// Looks up a summary by content hash, across conversations.
    async fn get_by_hash(&self, content_hash: &str) -> Result<Option<SummaryRecord>, CacheError>;

    /// Stores a record. Writing a hash that already exists is a no-op:
    /// entries are write-once.
    async fn insert(&self, record: SummaryRecord) -> Result<(), CacheError>;
}

/// In-memory reference implementation.
#[derive(Debug, Default)]
pub struct MemoryCache {
    by_hash: RwLock<HashMap<String, SummaryRecord>>,
    /// `(conversation_scope_id, url)` -> content hash.
    by_scope_url: RwLock<HashMap<(String, String), String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentCache for MemoryCache {
    async fn get_by_url(&self, conversation_scope_id: &str, url: &str) -> Result<Option<SummaryRecord>, CacheError> {
        let key = (conversation_scope_id.to_string(), url.to_string());
        let hash = {
            let index = self.by_scope_url.read().map_err(|_| CacheError("index lock poisoned".to_string()))?;
            index.get(&key).cloned()
        };
        match hash {
            Some(hash) => self.get_by_hash(&hash).await,
            None => Ok(None),
        }
    }

    async fn get_by_hash(&self, content_hash: &str) -> Result<Option<SummaryRecord>, CacheError> {
        let records = self.by_hash.read().map_err(|_| CacheError("record lock poisoned".to_string()))?;
        Ok(records.get(content_hash).cloned())
    }

    async fn insert(&self, record: SummaryRecord) -> Result<(), CacheError> {
        {
            let mut index = self.by_scope_url.write().map_err(|_| CacheError("index lock poisoned".to_string()))?;
            index
                .entry((record.conversation_scope_id.clone(), record.url.clone()))
                .or_insert_with(|| record.content_hash.clone());
        }
        let mut records = self.by_hash.write().map_err(|_| CacheError("record lock poisoned".to_string()))?;
        records.entry(record.content_hash.clone()).or_insert(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(scope: &str, url: &str, hash: &str, summary: &str) -> SummaryRecord {
        SummaryRecord {
            url: url.to_string(),
            title: Some("Title".to_string()),
            summary_text: summary.to_string(),
            raw_content_snapshot: "snapshot".to_string(),
            content_hash: hash.to_string(),
            conversation_scope_id: scope.to_string(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let cache = MemoryCache::new();
        cache.insert(record("conv-1", "https://example.com/a", "hash-a", "summary")).await.unwrap();

        let by_url = cache.get_by_url("conv-1", "https://example.com/a").await.unwrap();
        assert_eq!(by_url.unwrap().summary_text, "summary");

        let by_hash = cache.get_by_hash("hash-a").await.unwrap();
        assert_eq!(by_hash.unwrap().content_hash, "hash-a");
    }

    #[tokio::test]
    async fn test_miss_returns_none() {
        let cache = MemoryCache::new();
        assert!(cache.get_by_url("conv-1", "https://example.com/a").await.unwrap().is_none());
        assert!(cache.get_by_hash("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_scope_isolation() {
        let cache = MemoryCache::new();
        cache.insert(record("conv-1", "https://example.com/a", "hash-a", "summary")).await.unwrap();
        assert!(cache.get_by_url("conv-2", "https://example.com/a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_entries_are_write_once() {
        let cache = MemoryCache::new();
        cache.insert(record("conv-1", "https://example.com/a", "hash-a", "first")).await.unwrap();
        cache.insert(record("conv-1", "https://example.com/a", "hash-a", "second")).await.unwrap();

        let stored = cache.get_by_hash("hash-a").await.unwrap().unwrap();
        assert_eq!(stored.summary_text, "first");
    }

    #[tokio::test]
    async fn test_same_hash_shared_across_conversations() {
        let cache = MemoryCache::new();
        cache.insert(record("conv-1", "https://example.com/a", "hash-a", "summary")).await.unwrap();
        cache.insert(record("conv-2", "https://mirror.example.com/a", "hash-a", "ignored")).await.unwrap();

        let hit = cache.get_by_url("conv-2", "https://mirror.example.com/a").await.unwrap().unwrap();
        assert_eq!(hit.summary_text, "summary");
    }
}
