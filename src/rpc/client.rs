//! Typed client for the `urlshort.v1.UrlShortener` service.

use std::time::Duration;

use thiserror::Error;
use tonic::transport::Channel;
use tonic::{Code, Request};

use super::proto;
use super::proto::url_shortener_client::UrlShortenerClient;

/// Failure of a client call.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not connect to server: {0}")]
    Connect(#[from] tonic::transport::Error),
    /// The server answered with a non-OK status.
    #[error("{}: {}", .0.code(), .0.message())]
    Status(#[from] tonic::Status),
    #[error("server did not delete {0:?}")]
    NotDeleted(String),
}

impl ClientError {
    /// Returns the gRPC status code, if the server answered.
    pub fn code(&self) -> Option<Code> {
        match self {
            ClientError::Status(status) => Some(status.code()),
            _ => None,
        }
    }
}

/// Connection to a URL shortener gRPC server.
#[derive(Debug, Clone)]
pub struct UrlClient {
    inner: UrlShortenerClient<Channel>,
    timeout: Option<Duration>,
}

impl UrlClient {
    /// Connects to `addr`, e.g. `http://127.0.0.1:50051`.
    pub async fn connect(addr: impl Into<String>) -> Result<Self, ClientError> {
        let inner = UrlShortenerClient::connect(addr.into()).await?;
        Ok(Self::new(inner))
    }

    pub fn new(inner: UrlShortenerClient<Channel>) -> Self {
        Self {
            inner,
            timeout: None,
        }
    }

    /// Sends `timeout` as the `grpc-timeout` of every call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn request<T>(&self, message: T) -> Request<T> {
        let mut request = Request::new(message);
        if let Some(timeout) = self.timeout {
            request.set_timeout(timeout);
        }
        request
    }

    /// Shortens `url` and returns `(url, short_url)`.
    pub async fn create_url(&mut self, url: &str) -> Result<(String, String), ClientError> {
        let request = self.request(proto::CreateUrlRequest {
            url: url.to_string(),
        });

        let response = self.inner.create_url(request).await?.into_inner();

        Ok((response.url, response.short_url))
    }

    /// Resolves `id` and returns `(url, short_url)`.
    pub async fn get_url(&mut self, id: &str) -> Result<(String, String), ClientError> {
        let request = self.request(proto::UrlRequest { id: id.to_string() });

        let response = self.inner.get_url(request).await?.into_inner();

        Ok((response.url, response.short_url))
    }

    pub async fn delete_url(&mut self, id: &str) -> Result<(), ClientError> {
        let request = self.request(proto::UrlRequest { id: id.to_string() });

        let response = self.inner.delete_url(request).await?.into_inner();

        if !response.ok {
            return Err(ClientError::NotDeleted(id.to_string()));
        }

        Ok(())
    }

    pub async fn get_redirection_count(&mut self, id: &str) -> Result<i64, ClientError> {
        let request = self.request(proto::UrlRequest { id: id.to_string() });

        let response = self
            .inner
            .get_redirection_count(request)
            .await?
            .into_inner();

        Ok(response.count)
    }
}
