//! Process-local URL store.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::context::RequestContext;
use crate::domain::entities::ShortenedUrl;
use crate::domain::errors::StoreError;
use crate::domain::repositories::UrlStore;

/// In-memory store backed by a sharded concurrent map.
///
/// Data lives only as long as the process. Counter updates take the shard's
/// write lock, so concurrent increments on one key are never lost.
#[derive(Debug, Default)]
pub struct InMemoryUrlStore {
    urls: DashMap<String, ShortenedUrl>,
}

impl InMemoryUrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[async_trait]
impl UrlStore for InMemoryUrlStore {
    async fn add(&self, ctx: &RequestContext, short: &str, long: &str) -> Result<(), StoreError> {
        ctx.check()?;

        match self.urls.entry(short.to_string()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(short.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(ShortenedUrl::new(short, long));
                Ok(())
            }
        }
    }

    async fn get(&self, ctx: &RequestContext, short: &str) -> Result<String, StoreError> {
        ctx.check()?;

        self.urls
            .get(short)
            .map(|record| record.long.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, ctx: &RequestContext, short: &str) -> Result<(), StoreError> {
        ctx.check()?;

        self.urls
            .remove(short)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn increment_count(&self, ctx: &RequestContext, short: &str) -> Result<(), StoreError> {
        ctx.check()?;

        let mut record = self.urls.get_mut(short).ok_or(StoreError::NotFound)?;
        record.redirection_count += 1;

        Ok(())
    }

    async fn get_count(&self, ctx: &RequestContext, short: &str) -> Result<i64, StoreError> {
        ctx.check()?;

        self.urls
            .get(short)
            .map(|record| record.redirection_count)
            .ok_or(StoreError::NotFound)
    }

    async fn ping(&self, ctx: &RequestContext) -> Result<(), StoreError> {
        ctx.check()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_add_then_get() {
        let store = InMemoryUrlStore::new();
        let ctx = RequestContext::background();

        store.add(&ctx, "abc", "https://example.com").await.unwrap();

        assert_eq!(store.get(&ctx, "abc").await.unwrap(), "https://example.com");
        assert_eq!(store.get_count(&ctx, "abc").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_add_is_rejected() {
        let store = InMemoryUrlStore::new();
        let ctx = RequestContext::background();

        store.add(&ctx, "abc", "https://one.example").await.unwrap();
        let err = store
            .add(&ctx, "abc", "https://two.example")
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Conflict(ref id) if id == "abc"));
        assert_eq!(store.get(&ctx, "abc").await.unwrap(), "https://one.example");
    }

    #[tokio::test]
    async fn test_missing_key_is_not_found() {
        let store = InMemoryUrlStore::new();
        let ctx = RequestContext::background();

        assert!(matches!(store.get(&ctx, "nope").await, Err(StoreError::NotFound)));
        assert!(matches!(store.delete(&ctx, "nope").await, Err(StoreError::NotFound)));
        assert!(matches!(
            store.increment_count(&ctx, "nope").await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.get_count(&ctx, "nope").await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let store = InMemoryUrlStore::new();
        let ctx = RequestContext::background();

        store.add(&ctx, "abc", "https://example.com").await.unwrap();
        store.delete(&ctx, "abc").await.unwrap();

        assert!(store.is_empty());
        assert!(matches!(store.get(&ctx, "abc").await, Err(StoreError::NotFound)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_not_lost() {
        let store = Arc::new(InMemoryUrlStore::new());
        let ctx = RequestContext::background();
        store.add(&ctx, "abc", "https://example.com").await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..100 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .increment_count(&RequestContext::background(), "abc")
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.get_count(&ctx, "abc").await.unwrap(), 100);
    }

    #[tokio::test]
    async fn test_cancelled_context_is_rejected() {
        let store = InMemoryUrlStore::new();
        let ctx = RequestContext::background();
        ctx.cancel();

        let err = store.add(&ctx, "abc", "https://example.com").await.unwrap_err();

        assert!(matches!(err, StoreError::Aborted(_)));
        assert!(store.is_empty());
    }
}
