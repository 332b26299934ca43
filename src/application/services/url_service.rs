//! Shortened URL service: validation, id generation and short URL composition.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::domain::context::RequestContext;
use crate::domain::errors::{ServiceError, StoreError};
use crate::domain::repositories::{IdGenerator, UrlStore};

/// Base used to resolve absolute-path request URIs such as `/docs/index.html`.
const PATH_BASE: &str = "http://localhost/";

/// Operations exposed to the HTTP and gRPC adapters.
///
/// Both adapters hold an `Arc<dyn UrlOperations>` rather than a concrete
/// [`UrlService`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlOperations: Send + Sync {
    /// Shortens `long` and returns the domain-qualified short URL.
    async fn create_url(&self, ctx: &RequestContext, long: &str) -> Result<String, ServiceError>;

    /// Returns `(long URL, short URL)` for a short id.
    async fn get_url(
        &self,
        ctx: &RequestContext,
        short: &str,
    ) -> Result<(String, String), ServiceError>;

    async fn delete_url(&self, ctx: &RequestContext, short: &str) -> Result<(), ServiceError>;

    async fn increment_redirection_count(
        &self,
        ctx: &RequestContext,
        short: &str,
    ) -> Result<(), ServiceError>;

    async fn get_redirection_count(
        &self,
        ctx: &RequestContext,
        short: &str,
    ) -> Result<i64, ServiceError>;

    /// Checks that the backing store is reachable.
    async fn health_check(&self, ctx: &RequestContext) -> Result<(), ServiceError>;
}

/// Service managing shortened URLs.
///
/// Holds only immutable configuration and shared handles, so a single
/// instance can serve concurrent requests without locking. Every read and
/// write round-trips to the store.
pub struct UrlService<S: UrlStore, G: IdGenerator> {
    domain: String,
    generator: Arc<G>,
    store: Arc<S>,
}

impl<S: UrlStore, G: IdGenerator> UrlService<S, G> {
    /// Creates a new URL service.
    ///
    /// `domain` is the prefix joined with each short id to form the public
    /// short URL, e.g. `localhost:8080/` or `https://sho.rt`.
    pub fn new(domain: impl Into<String>, generator: Arc<G>, store: Arc<S>) -> Self {
        Self {
            domain: domain.into(),
            generator,
            store,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Creates a shortened URL.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidUrl`] if `long` is not a valid request
    /// URI; the generator and store are not called in that case.
    ///
    /// Returns [`ServiceError::Internal`] if id generation or persistence
    /// fails, including a generator collision rejected by the store.
    pub async fn create_url(&self, ctx: &RequestContext, long: &str) -> Result<String, ServiceError> {
        if !is_request_uri(long) {
            return Err(ServiceError::InvalidUrl);
        }

        let short = ctx
            .run(self.generator.generate(ctx))
            .await
            .map_err(|e| ServiceError::internal("could not generate URL", e))?
            .map_err(|e| ServiceError::internal("could not generate URL", e))?;

        self.guarded(ctx, "could not save URL in database", self.store.add(ctx, &short, long))
            .await?;

        debug!(short = %short, "created short URL");

        Ok(join_url(&self.domain, &short))
    }

    /// Gets the long URL and the short URL for a short id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the id is unknown.
    /// Returns [`ServiceError::Internal`] on other store failures.
    pub async fn get_url(
        &self,
        ctx: &RequestContext,
        short: &str,
    ) -> Result<(String, String), ServiceError> {
        let long = self
            .guarded(ctx, "could not retrieve URL from database", self.store.get(ctx, short))
            .await?;

        Ok((long, join_url(&self.domain, short)))
    }

    /// Deletes a shortened URL. Deleting an unknown id is `NotFound`.
    pub async fn delete_url(&self, ctx: &RequestContext, short: &str) -> Result<(), ServiceError> {
        self.guarded(ctx, "could not delete URL from database", self.store.delete(ctx, short))
            .await
    }

    /// Records one redirection of a shortened URL.
    pub async fn increment_redirection_count(
        &self,
        ctx: &RequestContext,
        short: &str,
    ) -> Result<(), ServiceError> {
        self.guarded(
            ctx,
            "could not increment URL redirection count in database",
            self.store.increment_count(ctx, short),
        )
        .await
    }

    /// Gets how many times a shortened URL has been redirected.
    pub async fn get_redirection_count(
        &self,
        ctx: &RequestContext,
        short: &str,
    ) -> Result<i64, ServiceError> {
        self.guarded(
            ctx,
            "could not get URL redirection count from database",
            self.store.get_count(ctx, short),
        )
        .await
    }

    /// Races a store call against the request context and classifies the
    /// outcome.
    async fn guarded<T, F>(
        &self,
        ctx: &RequestContext,
        context: &'static str,
        call: F,
    ) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        ctx.run(call)
            .await
            .map_err(|e| ServiceError::internal(context, e))?
            .map_err(|e| ServiceError::from_store(context, e))
    }
}

#[async_trait]
impl<S: UrlStore, G: IdGenerator> UrlOperations for UrlService<S, G> {
    async fn create_url(&self, ctx: &RequestContext, long: &str) -> Result<String, ServiceError> {
        UrlService::create_url(self, ctx, long).await
    }

    async fn get_url(
        &self,
        ctx: &RequestContext,
        short: &str,
    ) -> Result<(String, String), ServiceError> {
        UrlService::get_url(self, ctx, short).await
    }

    async fn delete_url(&self, ctx: &RequestContext, short: &str) -> Result<(), ServiceError> {
        UrlService::delete_url(self, ctx, short).await
    }

    async fn increment_redirection_count(
        &self,
        ctx: &RequestContext,
        short: &str,
    ) -> Result<(), ServiceError> {
        UrlService::increment_redirection_count(self, ctx, short).await
    }

    async fn get_redirection_count(
        &self,
        ctx: &RequestContext,
        short: &str,
    ) -> Result<i64, ServiceError> {
        UrlService::get_redirection_count(self, ctx, short).await
    }

    async fn health_check(&self, ctx: &RequestContext) -> Result<(), ServiceError> {
        self.guarded(ctx, "database is unreachable", self.store.ping(ctx))
            .await
    }
}

/// Reports whether `raw` parses as a request URI: either an absolute URI
/// with a scheme, or an absolute path.
///
/// The URL parser silently drops whitespace and control characters and
/// tolerates stray `%`. The raw string is what gets stored and later sent
/// back as a `Location` header, so those inputs are rejected up front.
pub fn is_request_uri(raw: &str) -> bool {
    if raw.is_empty() || raw.bytes().any(|b| b.is_ascii_control() || b == b' ') {
        return false;
    }

    // Escapes are only checked up to the query, which is kept opaque.
    let before_query = raw.split_once('?').map_or(raw, |(head, _)| head);
    if !has_valid_escapes(before_query) {
        return false;
    }

    if raw.starts_with('/') {
        return Url::parse(PATH_BASE)
            .and_then(|base| base.join(raw))
            .is_ok();
    }

    Url::parse(raw).is_ok()
}

/// Every `%` must start a two-digit hex escape.
fn has_valid_escapes(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            match bytes.get(i + 1..i + 3) {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }

    true
}

/// Joins a domain prefix and a short id with exactly one `/`.
///
/// A scheme separator in the domain (`https://`) is left intact; an empty
/// domain yields the bare id.
pub fn join_url(domain: &str, short: &str) -> String {
    let domain = domain.trim_end_matches('/');
    let short = short.trim_start_matches('/');

    if domain.is_empty() {
        return short.to_string();
    }

    format!("{domain}/{short}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::context::ContextError;
    use crate::domain::errors::{ErrorKind, GeneratorError};
    use crate::domain::repositories::{MockIdGenerator, MockUrlStore};
    use std::time::Duration;

    const DOMAIN: &str = "localhost:8080/";

    fn service(
        generator: MockIdGenerator,
        store: MockUrlStore,
    ) -> UrlService<MockUrlStore, MockIdGenerator> {
        UrlService::new(DOMAIN, Arc::new(generator), Arc::new(store))
    }

    fn generator_returning(id: &'static str) -> MockIdGenerator {
        let mut generator = MockIdGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(move |_| Ok(id.to_string()));
        generator
    }

    #[tokio::test]
    async fn test_create_url_success() {
        let mut store = MockUrlStore::new();
        store
            .expect_add()
            .withf(|_, short, long| short == "abc" && long == "https://example.com")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = service(generator_returning("abc"), store);

        let short_url = service
            .create_url(&RequestContext::background(), "https://example.com")
            .await
            .unwrap();

        assert_eq!(short_url, "localhost:8080/abc");
    }

    #[tokio::test]
    async fn test_create_url_accepts_absolute_path() {
        let mut store = MockUrlStore::new();
        store.expect_add().times(1).returning(|_, _, _| Ok(()));

        let service = service(generator_returning("p1"), store);

        let result = service
            .create_url(&RequestContext::background(), "/docs/index.html")
            .await;

        assert_eq!(result.unwrap(), "localhost:8080/p1");
    }

    #[tokio::test]
    async fn test_create_url_invalid_url_skips_generator_and_store() {
        let mut generator = MockIdGenerator::new();
        generator.expect_generate().times(0);
        let mut store = MockUrlStore::new();
        store.expect_add().times(0);

        let service = service(generator, store);

        for input in [
            "not-a-url",
            "",
            "invalidURL",
            "example.com/path",
            "#frag",
            "https://example.com/a\nb",
            "https://example.com/a\tb",
            " https://example.com",
            "https://example.com ",
            "https://example.com/%zz",
            "https://example.com/100%",
            "/path/%4",
        ] {
            let err = service
                .create_url(&RequestContext::background(), input)
                .await
                .unwrap_err();

            assert!(matches!(err, ServiceError::InvalidUrl), "input: {input:?}");
        }
    }

    #[tokio::test]
    async fn test_create_url_generator_failure() {
        let mut generator = MockIdGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|_| Err(GeneratorError::Aborted(ContextError::Cancelled)));
        let mut store = MockUrlStore::new();
        store.expect_add().times(0);

        let service = service(generator, store);

        let err = service
            .create_url(&RequestContext::background(), "https://example.com")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.to_string(), "could not generate URL");
    }

    #[tokio::test]
    async fn test_create_url_store_failure() {
        let mut store = MockUrlStore::new();
        store
            .expect_add()
            .times(1)
            .returning(|_, _, _| Err(StoreError::Database(sqlx::Error::PoolClosed)));

        let service = service(generator_returning("abc"), store);

        let err = service
            .create_url(&RequestContext::background(), "https://example.com")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.to_string(), "could not save URL in database");
    }

    #[tokio::test]
    async fn test_get_url_success() {
        let mut store = MockUrlStore::new();
        store
            .expect_get()
            .withf(|_, short| short == "abc")
            .times(1)
            .returning(|_, _| Ok("https://example.com".to_string()));

        let service = service(MockIdGenerator::new(), store);

        let (long, short_url) = service
            .get_url(&RequestContext::background(), "abc")
            .await
            .unwrap();

        assert_eq!(long, "https://example.com");
        assert_eq!(short_url, "localhost:8080/abc");
    }

    #[tokio::test]
    async fn test_not_found_is_propagated_unwrapped() {
        let mut store = MockUrlStore::new();
        store
            .expect_get()
            .returning(|_, _| Err(StoreError::NotFound));
        store
            .expect_delete()
            .returning(|_, _| Err(StoreError::NotFound));
        store
            .expect_increment_count()
            .returning(|_, _| Err(StoreError::NotFound));
        store
            .expect_get_count()
            .returning(|_, _| Err(StoreError::NotFound));

        let service = service(MockIdGenerator::new(), store);
        let ctx = RequestContext::background();

        assert!(matches!(
            service.get_url(&ctx, "missing").await,
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            service.delete_url(&ctx, "missing").await,
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            service.increment_redirection_count(&ctx, "missing").await,
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            service.get_redirection_count(&ctx, "missing").await,
            Err(ServiceError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_other_store_failures_are_internal() {
        let mut store = MockUrlStore::new();
        store
            .expect_get()
            .returning(|_, _| Err(StoreError::Database(sqlx::Error::PoolTimedOut)));
        store
            .expect_delete()
            .returning(|_, _| Err(StoreError::Database(sqlx::Error::PoolTimedOut)));
        store
            .expect_increment_count()
            .returning(|_, _| Err(StoreError::Database(sqlx::Error::PoolTimedOut)));
        store
            .expect_get_count()
            .returning(|_, _| Err(StoreError::Database(sqlx::Error::PoolTimedOut)));

        let service = service(MockIdGenerator::new(), store);
        let ctx = RequestContext::background();

        let get = service.get_url(&ctx, "abc").await.unwrap_err();
        assert_eq!(get.to_string(), "could not retrieve URL from database");

        let delete = service.delete_url(&ctx, "abc").await.unwrap_err();
        assert_eq!(delete.to_string(), "could not delete URL from database");

        let increment = service
            .increment_redirection_count(&ctx, "abc")
            .await
            .unwrap_err();
        assert_eq!(
            increment.to_string(),
            "could not increment URL redirection count in database"
        );

        let count = service.get_redirection_count(&ctx, "abc").await.unwrap_err();
        assert_eq!(
            count.to_string(),
            "could not get URL redirection count from database"
        );
    }

    #[tokio::test]
    async fn test_get_redirection_count_success() {
        let mut store = MockUrlStore::new();
        store
            .expect_get_count()
            .withf(|_, short| short == "abc")
            .times(1)
            .returning(|_, _| Ok(7));

        let service = service(MockIdGenerator::new(), store);

        let count = service
            .get_redirection_count(&RequestContext::background(), "abc")
            .await
            .unwrap();

        assert_eq!(count, 7);
    }

    #[tokio::test]
    async fn test_cancelled_context_never_reaches_store() {
        let mut store = MockUrlStore::new();
        store.expect_get().times(0);

        let service = service(MockIdGenerator::new(), store);
        let ctx = RequestContext::background();
        ctx.cancel();

        let err = service.get_url(&ctx, "abc").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.report().ends_with("operation cancelled"));
    }

    /// Store whose every call hangs until the caller gives up.
    struct StalledStore;

    #[async_trait]
    impl UrlStore for StalledStore {
        async fn add(&self, _: &RequestContext, _: &str, _: &str) -> Result<(), StoreError> {
            std::future::pending().await
        }

        async fn get(&self, _: &RequestContext, _: &str) -> Result<String, StoreError> {
            std::future::pending().await
        }

        async fn delete(&self, _: &RequestContext, _: &str) -> Result<(), StoreError> {
            std::future::pending().await
        }

        async fn increment_count(&self, _: &RequestContext, _: &str) -> Result<(), StoreError> {
            std::future::pending().await
        }

        async fn get_count(&self, _: &RequestContext, _: &str) -> Result<i64, StoreError> {
            std::future::pending().await
        }

        async fn ping(&self, _: &RequestContext) -> Result<(), StoreError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_aborts_stalled_store() {
        let service = UrlService::new(
            DOMAIN,
            Arc::new(generator_returning("abc")),
            Arc::new(StalledStore),
        );
        let ctx = RequestContext::with_timeout(Duration::from_secs(2));

        let err = service
            .create_url(&ctx, "https://example.com")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.to_string(), "could not save URL in database");
        assert!(err.report().ends_with("deadline exceeded"));
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("localhost:8080/", "abc"), "localhost:8080/abc");
        assert_eq!(join_url("localhost:8080", "abc"), "localhost:8080/abc");
        assert_eq!(join_url("localhost:8080//", "/abc"), "localhost:8080/abc");
        assert_eq!(join_url("https://sho.rt/", "abc"), "https://sho.rt/abc");
        assert_eq!(join_url("", "abc"), "abc");
    }

    #[test]
    fn test_is_request_uri() {
        assert!(is_request_uri("https://example.com"));
        assert!(is_request_uri("http://example.com/path?q=1"));
        assert!(is_request_uri("/relative/path"));
        assert!(is_request_uri("mailto:someone@example.com"));

        assert!(!is_request_uri(""));
        assert!(!is_request_uri("not-a-url"));
        assert!(!is_request_uri("#section"));
    }

    #[test]
    fn test_is_request_uri_rejects_what_the_parser_would_rewrite() {
        assert!(is_request_uri("https://example.com/a%20b"));
        assert!(is_request_uri("https://example.com/%E2%82%AC"));
        assert!(is_request_uri("https://example.com/?q=100%"));

        assert!(!is_request_uri("https://example.com/a\r\nb"));
        assert!(!is_request_uri("https://example.com/\x7f"));
        assert!(!is_request_uri("https://example.com/a b"));
        assert!(!is_request_uri("\thttps://example.com"));
        assert!(!is_request_uri("https://example.com/%g0"));
        assert!(!is_request_uri("https://example.com/%"));
    }
}
