//! Infrastructure layer for external integrations.
//!
//! Concrete implementations of the capability traits declared in
//! [`crate::domain::repositories`].
//!
//! # Modules
//!
//! - [`generator`] - Short id generation
//! - [`persistence`] - SQLite and in-memory URL stores

pub mod generator;
pub mod persistence;
