//! Request-scoped extractors.

use std::convert::Infallible;
use std::ops::Deref;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tokio_util::sync::DropGuard;

use crate::domain::context::RequestContext;
use crate::state::AppState;

/// [`RequestContext`] bound to the lifetime of one HTTP request.
///
/// The context expires after the configured request timeout. It is cancelled
/// as soon as the handler future is dropped, which is what hyper does when
/// the client disconnects mid-request.
pub struct RequestScope {
    ctx: RequestContext,
    _guard: DropGuard,
}

impl RequestScope {
    pub fn new(ctx: RequestContext) -> Self {
        let guard = ctx.cancel_on_drop();
        Self { ctx, _guard: guard }
    }
}

impl Deref for RequestScope {
    type Target = RequestContext;

    fn deref(&self) -> &Self::Target {
        &self.ctx
    }
}

impl FromRequestParts<AppState> for RequestScope {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::new(RequestContext::with_timeout(state.request_timeout)))
    }
}
