//! gRPC adapter over [`UrlOperations`].

use std::sync::Arc;
use std::time::Duration;

use tonic::{Request, Response, Status};
use tracing::error;

use super::proto;
use super::proto::url_shortener_server::UrlShortener;
use super::timeout;
use crate::application::services::UrlOperations;
use crate::domain::context::RequestContext;
use crate::domain::errors::ServiceError;

/// Serves the `urlshort.v1.UrlShortener` service.
///
/// Each call gets its own [`RequestContext`], bounded by the configured
/// request timeout and by the caller's `grpc-timeout`, whichever is earlier.
/// The context is cancelled if tonic drops the call.
#[derive(Clone)]
pub struct UrlShortenerRpc {
    service: Arc<dyn UrlOperations>,
    request_timeout: Duration,
}

impl UrlShortenerRpc {
    pub fn new(service: Arc<dyn UrlOperations>, request_timeout: Duration) -> Self {
        Self {
            service,
            request_timeout,
        }
    }

    fn context<T>(&self, request: &Request<T>) -> RequestContext {
        let ctx = RequestContext::with_timeout(self.request_timeout);

        match timeout::from_metadata(request.metadata()) {
            Some(caller) => ctx.timeout(caller),
            None => ctx,
        }
    }
}

impl From<ServiceError> for Status {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidUrl => Status::invalid_argument(err.to_string()),
            ServiceError::NotFound => Status::not_found(err.to_string()),
            ServiceError::Internal { .. } => {
                error!(error = %err.report(), "rpc failed");
                Status::internal(err.to_string())
            }
        }
    }
}

#[tonic::async_trait]
impl UrlShortener for UrlShortenerRpc {
    async fn create_url(
        &self,
        request: Request<proto::CreateUrlRequest>,
    ) -> Result<Response<proto::UrlResponse>, Status> {
        let ctx = self.context(&request);
        let _guard = ctx.cancel_on_drop();
        let url = request.into_inner().url;

        let short_url = self.service.create_url(&ctx, &url).await?;

        Ok(Response::new(proto::UrlResponse { url, short_url }))
    }

    async fn get_url(
        &self,
        request: Request<proto::UrlRequest>,
    ) -> Result<Response<proto::UrlResponse>, Status> {
        let ctx = self.context(&request);
        let _guard = ctx.cancel_on_drop();
        let id = request.into_inner().id;

        let (url, short_url) = self.service.get_url(&ctx, &id).await?;

        Ok(Response::new(proto::UrlResponse { url, short_url }))
    }

    async fn delete_url(
        &self,
        request: Request<proto::UrlRequest>,
    ) -> Result<Response<proto::DeleteUrlResponse>, Status> {
        let ctx = self.context(&request);
        let _guard = ctx.cancel_on_drop();
        let id = request.into_inner().id;

        self.service.delete_url(&ctx, &id).await?;

        Ok(Response::new(proto::DeleteUrlResponse { ok: true }))
    }

    async fn get_redirection_count(
        &self,
        request: Request<proto::UrlRequest>,
    ) -> Result<Response<proto::RedirectionCountResponse>, Status> {
        let ctx = self.context(&request);
        let _guard = ctx.cancel_on_drop();
        let id = request.into_inner().id;

        let count = self.service.get_redirection_count(&ctx, &id).await?;

        Ok(Response::new(proto::RedirectionCountResponse { id, count }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::MockUrlOperations;
    use crate::domain::errors::StoreError;
    use tonic::Code;

    fn rpc(service: MockUrlOperations) -> UrlShortenerRpc {
        UrlShortenerRpc::new(Arc::new(service), Duration::from_secs(30))
    }

    #[tokio::test]
    async fn test_create_url() {
        let mut service = MockUrlOperations::new();
        service
            .expect_create_url()
            .withf(|_, long| long == "https://example.com")
            .times(1)
            .returning(|_, _| Ok("localhost:8080/abc".to_string()));

        let response = rpc(service)
            .create_url(Request::new(proto::CreateUrlRequest {
                url: "https://example.com".to_string(),
            }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(response.url, "https://example.com");
        assert_eq!(response.short_url, "localhost:8080/abc");
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let mut service = MockUrlOperations::new();
        service
            .expect_create_url()
            .returning(|_, _| Err(ServiceError::InvalidUrl));
        service
            .expect_get_url()
            .returning(|_, _| Err(ServiceError::NotFound));
        service.expect_delete_url().returning(|_, _| {
            Err(ServiceError::internal(
                "could not delete URL from database",
                StoreError::Database(sqlx::Error::PoolTimedOut),
            ))
        });

        let rpc = rpc(service);

        let status = rpc
            .create_url(Request::new(proto::CreateUrlRequest {
                url: "not-a-url".to_string(),
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "invalid URL provided");

        let status = rpc
            .get_url(Request::new(proto::UrlRequest { id: "nope".to_string() }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::NotFound);

        let status = rpc
            .delete_url(Request::new(proto::UrlRequest { id: "abc".to_string() }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), "could not delete URL from database");
    }

    #[tokio::test]
    async fn test_delete_and_count() {
        let mut service = MockUrlOperations::new();
        service.expect_delete_url().times(1).returning(|_, _| Ok(()));
        service
            .expect_get_redirection_count()
            .withf(|_, id| id == "abc")
            .returning(|_, _| Ok(3));

        let rpc = rpc(service);

        let deleted = rpc
            .delete_url(Request::new(proto::UrlRequest { id: "abc".to_string() }))
            .await
            .unwrap()
            .into_inner();
        assert!(deleted.ok);

        let count = rpc
            .get_redirection_count(Request::new(proto::UrlRequest { id: "abc".to_string() }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(count.id, "abc");
        assert_eq!(count.count, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_caller_deadline_is_applied() {
        let mut service = MockUrlOperations::new();
        service
            .expect_get_url()
            .withf(|ctx, _| {
                ctx.deadline().is_some_and(|deadline| {
                    deadline <= tokio::time::Instant::now() + Duration::from_millis(100)
                })
            })
            .times(1)
            .returning(|_, _| Ok(("https://example.com".into(), "localhost:8080/abc".into())));

        let mut request = Request::new(proto::UrlRequest { id: "abc".to_string() });
        request
            .metadata_mut()
            .insert(timeout::GRPC_TIMEOUT_HEADER, "100m".parse().unwrap());

        let response = rpc(service).get_url(request).await.unwrap();

        assert_eq!(response.into_inner().url, "https://example.com");
    }
}
