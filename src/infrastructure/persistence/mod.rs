//! URL store implementations.
//!
//! # Stores
//!
//! - [`SqliteUrlStore`] - Durable storage in a SQLite database
//! - [`InMemoryUrlStore`] - Process-local map, lost on restart

pub mod memory_url_store;
pub mod sqlite_url_store;

pub use memory_url_store::InMemoryUrlStore;
pub use sqlite_url_store::SqliteUrlStore;
