//! Capability traits the service depends on.
//!
//! Both traits are injected into [`crate::application::services::UrlService`]
//! at construction; implementations live in `crate::infrastructure`. Mock
//! implementations are auto-generated via `mockall` for unit tests.
//!
//! - [`UrlStore`] - Persistence of short id → long URL mappings and counters
//! - [`IdGenerator`] - Source of new short ids

pub mod id_generator;
pub mod url_store;

pub use id_generator::IdGenerator;
pub use url_store::UrlStore;

#[cfg(test)]
pub use id_generator::MockIdGenerator;
#[cfg(test)]
pub use url_store::MockUrlStore;
