//! gRPC interface.
//!
//! The service definition lives in `proto/urlshort/v1/url_shortener.proto`
//! and is compiled by the build script.
//!
//! # Modules
//!
//! - [`server`] - [`UrlShortenerRpc`], the server-side adapter
//! - [`client`] - [`UrlClient`], a thin typed client
//! - [`timeout`] - `grpc-timeout` header parsing

pub mod client;
pub mod server;
pub mod timeout;

/// Code generated from the protobuf definitions.
pub mod proto {
    pub mod v1 {
        tonic::include_proto!("urlshort.v1");
    }

    pub use v1::*;
}

pub use client::{ClientError, UrlClient};
pub use server::UrlShortenerRpc;
