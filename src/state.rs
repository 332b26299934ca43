//! Shared state injected into every HTTP handler.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::UrlOperations;

/// Application state, cloned per request.
///
/// Both fields are cheap to clone: the service sits behind an [`Arc`].
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<dyn UrlOperations>,
    /// Deadline applied to each request's [`RequestContext`](crate::domain::RequestContext).
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(url_service: Arc<dyn UrlOperations>, request_timeout: Duration) -> Self {
        Self {
            url_service,
            request_timeout,
        }
    }
}
