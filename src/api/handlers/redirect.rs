//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
};
use tracing::warn;
use url::{Position, Url};

use crate::api::extract::RequestScope;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short id to its original URL.
///
/// # Endpoint
///
/// `GET /{id}`
///
/// # Request Flow
///
/// 1. Look up the long URL
/// 2. Record the redirect in the counter
/// 3. Return 307 Temporary Redirect
///
/// A failed counter update is logged and otherwise ignored; it never blocks
/// the redirect.
///
/// # Errors
///
/// Returns 404 Not Found if the id doesn't exist, and 500 if the stored URL
/// cannot be sent as a `Location` header.
pub async fn redirect_handler(
    State(state): State<AppState>,
    ctx: RequestScope,
    Path(id): Path<String>,
) -> Result<(StatusCode, [(header::HeaderName, HeaderValue); 1]), AppError> {
    let (long_url, _) = state.url_service.get_url(&ctx, &id).await?;
    let location = location_header(&long_url)?;

    if let Err(e) = state
        .url_service
        .increment_redirection_count(&ctx, &id)
        .await
    {
        warn!(short = %id, error = %e.report(), "failed to record redirect");
    }

    Ok((
        StatusCode::TEMPORARY_REDIRECT,
        [(header::LOCATION, location)],
    ))
}

/// Builds the `Location` value for a stored URL.
///
/// Plain ASCII URLs are sent verbatim. Anything else goes through the URL
/// parser, which percent-encodes the path and punycodes the host.
fn location_header(long_url: &str) -> Result<HeaderValue, AppError> {
    let unusable = || {
        warn!(url = %long_url.escape_debug(), "stored URL is not a valid Location");
        AppError::internal("stored URL cannot be used as a redirect target")
    };

    // The parser would drop these rather than fail.
    if long_url.bytes().any(|b| b.is_ascii_control()) {
        return Err(unusable());
    }

    if let Ok(value) = HeaderValue::from_str(long_url) {
        return Ok(value);
    }

    let encoded = if long_url.starts_with('/') {
        Url::parse("http://localhost/")
            .and_then(|base| base.join(long_url))
            .map(|url| url[Position::BeforePath..].to_string())
    } else {
        Url::parse(long_url).map(String::from)
    };

    encoded
        .ok()
        .and_then(|location| HeaderValue::from_str(&location).ok())
        .ok_or_else(unusable)
}
