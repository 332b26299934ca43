//! API route configuration.

use crate::api::handlers::{
    count_handler, create_url_handler, delete_url_handler, get_url_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes nested under `/api`.
///
/// # Endpoints
///
/// - `POST   /url`            - Shorten a URL
/// - `GET    /url/{id}`       - Look up a short id
/// - `DELETE /url/{id}`       - Delete a short id
/// - `GET    /url/{id}/count` - Redirect count of a short id
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/url", post(create_url_handler))
        .route("/url/{id}", get(get_url_handler).delete(delete_url_handler))
        .route("/url/{id}/count", get(count_handler))
}
