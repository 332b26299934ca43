//! Storage contract for shortened URLs.

use crate::domain::context::RequestContext;
use crate::domain::errors::StoreError;
use async_trait::async_trait;

/// Durable short id → long URL persistence with a per-key redirection counter.
///
/// Every operation is individually atomic. Lookups, deletes and counter
/// operations on an absent key fail with [`StoreError::NotFound`]; adding a
/// key that already exists fails with [`StoreError::Conflict`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteUrlStore`] - SQLite implementation
/// - [`crate::infrastructure::persistence::InMemoryUrlStore`] - Process-local map
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_url.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// Persists a new mapping with a redirection count of zero.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if `short` already exists and
    /// [`StoreError::Database`] if the backend fails.
    async fn add(&self, ctx: &RequestContext, short: &str, long: &str) -> Result<(), StoreError>;

    /// Returns the long URL stored under `short`.
    async fn get(&self, ctx: &RequestContext, short: &str) -> Result<String, StoreError>;

    /// Removes the mapping for `short`.
    async fn delete(&self, ctx: &RequestContext, short: &str) -> Result<(), StoreError>;

    /// Adds one to the redirection count of `short` in a single atomic update.
    async fn increment_count(&self, ctx: &RequestContext, short: &str) -> Result<(), StoreError>;

    /// Returns the redirection count of `short`.
    async fn get_count(&self, ctx: &RequestContext, short: &str) -> Result<i64, StoreError>;

    /// Verifies the backend is reachable. Used by the health endpoint.
    async fn ping(&self, ctx: &RequestContext) -> Result<(), StoreError>;
}
