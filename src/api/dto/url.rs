//! DTOs for the `/api/url` endpoints.

use serde::{Deserialize, Serialize};

/// Request to shorten a URL.
#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    #[serde(rename = "URL", alias = "url")]
    pub url: String,
}

/// A long URL together with its short URL.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UrlResponse {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "ShortURL")]
    pub short_url: String,
}

/// Number of redirects recorded for a short id.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountResponse {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Count")]
    pub count: i64,
}
