//! Error taxonomy shared by the service, stores and generators.
//!
//! Only two failure kinds are meaningful to callers: the input was not a
//! valid URL, or the short id does not exist. Everything else is folded into
//! [`ServiceError::Internal`], whose `Display` names the failed operation and
//! whose [`source`](std::error::Error::source) carries the underlying cause
//! for logging.

use thiserror::Error;

use crate::domain::context::ContextError;

/// Boxed lower-layer failure wrapped by [`ServiceError::Internal`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure reported by a [`UrlStore`](crate::domain::repositories::UrlStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The short id is not present in the store.
    #[error("URL not found")]
    NotFound,
    /// The short id is already taken.
    #[error("short id {0:?} already exists")]
    Conflict(String),
    #[error("store operation aborted")]
    Aborted(#[from] ContextError),
    #[error("database error")]
    Database(#[from] sqlx::Error),
}

/// Failure reported by an [`IdGenerator`](crate::domain::repositories::IdGenerator).
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("random source failed: {0}")]
    Entropy(getrandom::Error),
    #[error("generation aborted")]
    Aborted(#[from] ContextError),
}

/// Coarse classification of a [`ServiceError`], for adapters that only need
/// to pick a wire status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidUrl,
    NotFound,
    Internal,
}

/// Error returned by every service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid URL provided")]
    InvalidUrl,

    #[error("URL not found")]
    NotFound,

    /// Generator, storage or cancellation failure. `context` identifies the
    /// operation; the cause is kept out of `Display`.
    #[error("{context}")]
    Internal {
        context: &'static str,
        #[source]
        source: BoxError,
    },
}

impl ServiceError {
    pub fn internal(context: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Internal {
            context,
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidUrl => ErrorKind::InvalidUrl,
            ServiceError::NotFound => ErrorKind::NotFound,
            ServiceError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Maps a store failure, passing `NotFound` through unwrapped.
    pub(crate) fn from_store(context: &'static str, error: StoreError) -> Self {
        match error {
            StoreError::NotFound => ServiceError::NotFound,
            other => ServiceError::internal(context, other),
        }
    }

    /// Renders the error together with its full cause chain, for logs.
    pub fn report(&self) -> String {
        let mut rendered = self.to_string();
        let mut cause = std::error::Error::source(self);

        while let Some(err) = cause {
            rendered.push_str(": ");
            rendered.push_str(&err.to_string());
            cause = err.source();
        }

        rendered
    }
}
