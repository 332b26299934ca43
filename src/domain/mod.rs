//! Domain layer containing business entities and contracts.
//!
//! The domain layer has no dependencies on the presentation layers. It
//! defines what the service needs from the outside world and how failures
//! are classified.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Store and generator trait definitions
//! - [`errors`] - Service, store and generator error types
//! - [`context`] - Per-request cancellation and deadline token

pub mod context;
pub mod entities;
pub mod errors;
pub mod repositories;

pub use context::{ContextError, RequestContext};
pub use errors::{ErrorKind, GeneratorError, ServiceError, StoreError};
