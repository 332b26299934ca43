//! Business logic services for the application layer.

pub mod url_service;

#[cfg(test)]
pub use url_service::MockUrlOperations;
pub use url_service::{UrlOperations, UrlService, is_request_uri, join_url};
