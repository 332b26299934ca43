//! Random short id generation.
//!
//! Ids are drawn from the operating system's entropy source and encoded as
//! URL-safe base64 without padding, so they can be used verbatim as a path
//! segment.

use async_trait::async_trait;
use base64::Engine as _;

use crate::domain::context::RequestContext;
use crate::domain::errors::GeneratorError;
use crate::domain::repositories::IdGenerator;

/// Default number of random bytes per id; encodes to 8 characters.
pub const DEFAULT_ID_BYTES: usize = 6;

/// Smallest accepted id length in bytes.
pub const MIN_ID_BYTES: usize = 4;

/// Largest accepted id length in bytes.
pub const MAX_ID_BYTES: usize = 24;

/// Generates cryptographically random short ids.
#[derive(Debug, Clone, Copy)]
pub struct RandomIdGenerator {
    bytes: usize,
}

impl RandomIdGenerator {
    /// Creates a generator drawing `bytes` random bytes per id, clamped to
    /// [`MIN_ID_BYTES`]..=[`MAX_ID_BYTES`].
    pub fn new(bytes: usize) -> Self {
        Self {
            bytes: bytes.clamp(MIN_ID_BYTES, MAX_ID_BYTES),
        }
    }

    /// Length in characters of every id this generator produces.
    pub fn id_len(&self) -> usize {
        base64::encoded_len(self.bytes, false).unwrap_or(0)
    }

    fn generate_id(&self) -> Result<String, GeneratorError> {
        let mut buffer = [0u8; MAX_ID_BYTES];
        let buffer = &mut buffer[..self.bytes];

        getrandom::fill(buffer).map_err(GeneratorError::Entropy)?;

        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ID_BYTES)
    }
}

#[async_trait]
impl IdGenerator for RandomIdGenerator {
    async fn generate(&self, ctx: &RequestContext) -> Result<String, GeneratorError> {
        ctx.check()?;
        self.generate_id()
    }
}
