//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without business logic. The store owns
//! every persisted record; the service never caches one.
//!
//! - [`ShortenedUrl`] - A short id mapped to a long URL with its redirection count

pub mod shortened_url;

pub use shortened_url::ShortenedUrl;
