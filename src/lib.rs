//! # URL Shortener
//!
//! A URL shortening service with an HTTP JSON API and a gRPC interface,
//! backed by SQLite.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Entities, errors, request context and capability traits
//! - **Application Layer** ([`application`]) - The URL service
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite and in-memory stores, id generation
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//! - **RPC Layer** ([`rpc`]) - gRPC server adapter and client
//!
//! ## Quick Start
//!
//! ```bash
//! export DATABASE_URL="sqlite://urlshort.db"
//! export DOMAIN="localhost:8080/"
//!
//! cargo run
//!
//! curl -X POST localhost:8080/api/url -d '{"URL":"https://example.com"}' \
//!      -H 'content-type: application/json'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod rpc;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{UrlOperations, UrlService};
    pub use crate::domain::entities::ShortenedUrl;
    pub use crate::domain::errors::{ErrorKind, ServiceError, StoreError};
    pub use crate::domain::repositories::{IdGenerator, UrlStore};
    pub use crate::domain::{ContextError, RequestContext};
    pub use crate::error::AppError;
    pub use crate::infrastructure::generator::RandomIdGenerator;
    pub use crate::infrastructure::persistence::{InMemoryUrlStore, SqliteUrlStore};
    pub use crate::routes::app_router;
    pub use crate::state::AppState;
}
