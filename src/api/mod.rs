//! HTTP JSON API.
//!
//! Translates HTTP requests into [`UrlOperations`](crate::application::services::UrlOperations)
//! calls and renders their results.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`extract`] - Request-scoped extractors
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request ID and tracing middleware
//! - [`routes`] - Route configuration and composition

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
