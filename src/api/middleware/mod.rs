//! HTTP middleware for request processing.
//!
//! Provides request ID propagation and request logging.

pub mod request_id;
pub mod tracing;
