//! Application layer: the URL shortening service.
//!
//! [`services::UrlService`] validates input, draws short ids from an
//! [`IdGenerator`](crate::domain::repositories::IdGenerator) and persists
//! through a [`UrlStore`](crate::domain::repositories::UrlStore). Both the
//! HTTP and the gRPC adapters talk to it through
//! [`services::UrlOperations`].

pub mod services;
