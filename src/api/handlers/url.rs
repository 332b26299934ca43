//! Handlers for the `/api/url` endpoints.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::url::{CountResponse, CreateUrlRequest, UrlResponse};
use crate::api::extract::RequestScope;
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a URL.
///
/// # Endpoint
///
/// `POST /api/url`
///
/// # Request Body
///
/// ```json
/// { "URL": "https://example.com" }
/// ```
///
/// # Response
///
/// **201 Created**
///
/// ```json
/// { "URL": "https://example.com", "ShortURL": "localhost:8080/Xk3_a9Qz" }
/// ```
///
/// The body is decoded as JSON whatever its `Content-Type`.
///
/// # Errors
///
/// - **400 Bad Request**: Malformed body or invalid URL
/// - **500 Internal Server Error**: Generation or storage failure
pub async fn create_url_handler(
    State(state): State<AppState>,
    ctx: RequestScope,
    body: Bytes,
) -> Result<(StatusCode, Json<UrlResponse>), AppError> {
    let request: CreateUrlRequest = serde_json::from_slice(&body)?;

    let short_url = state.url_service.create_url(&ctx, &request.url).await?;

    Ok((
        StatusCode::CREATED,
        Json(UrlResponse {
            url: request.url,
            short_url,
        }),
    ))
}

/// Returns the long and short URL for an id.
///
/// # Endpoint
///
/// `GET /api/url/{id}`
///
/// # Errors
///
/// - **404 Not Found**: Unknown id
/// - **500 Internal Server Error**: Storage failure
pub async fn get_url_handler(
    State(state): State<AppState>,
    ctx: RequestScope,
    Path(id): Path<String>,
) -> Result<Json<UrlResponse>, AppError> {
    let (url, short_url) = state.url_service.get_url(&ctx, &id).await?;

    Ok(Json(UrlResponse { url, short_url }))
}

/// Deletes a shortened URL.
///
/// # Endpoint
///
/// `DELETE /api/url/{id}`
///
/// # Response
///
/// **204 No Content**
///
/// # Errors
///
/// - **404 Not Found**: Unknown id
/// - **500 Internal Server Error**: Storage failure
pub async fn delete_url_handler(
    State(state): State<AppState>,
    ctx: RequestScope,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.url_service.delete_url(&ctx, &id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Returns how many times a short URL has been followed.
///
/// # Endpoint
///
/// `GET /api/url/{id}/count`
///
/// # Response
///
/// ```json
/// { "ID": "Xk3_a9Qz", "Count": 42 }
/// ```
pub async fn count_handler(
    State(state): State<AppState>,
    ctx: RequestScope,
    Path(id): Path<String>,
) -> Result<Json<CountResponse>, AppError> {
    let count = state.url_service.get_redirection_count(&ctx, &id).await?;

    Ok(Json(CountResponse { id, count }))
}
