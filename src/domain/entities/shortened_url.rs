//! Shortened URL entity.

/// A persisted mapping from a short id to its long URL.
///
/// `short` is the primary key. `long` is never modified after creation and
/// `redirection_count` only ever grows, one step per recorded redirect.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ShortenedUrl {
    pub short: String,
    pub long: String,
    #[sqlx(rename = "count")]
    pub redirection_count: i64,
}

impl ShortenedUrl {
    /// Creates a fresh record with a zero redirection count.
    pub fn new(short: impl Into<String>, long: impl Into<String>) -> Self {
        Self {
            short: short.into(),
            long: long.into(),
            redirection_count: 0,
        }
    }
}
