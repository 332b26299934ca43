//! Short id generation contract.

use crate::domain::context::RequestContext;
use crate::domain::errors::GeneratorError;
use async_trait::async_trait;

/// Produces new short identifiers.
///
/// Uniqueness is the generator's concern (or the store's primary key); the
/// service never checks for collisions and never retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdGenerator: Send + Sync {
    async fn generate(&self, ctx: &RequestContext) -> Result<String, GeneratorError>;
}
