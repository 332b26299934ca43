//! Data Transfer Objects for API requests and responses.
//!
//! Field names are part of the wire contract and are spelled out with
//! `#[serde(rename)]`.

pub mod health;
pub mod url;
