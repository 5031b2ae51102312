//! Content-derived entity tags.
//!
//! The tag is computed over the RFC 8785 (JCS) canonical JSON form of the
//! response payload, so equal payloads produce equal tags no matter how
//! they were built or in which order map keys were inserted.

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Salt used when the service configuration does not set one.
pub const DEFAULT_ETAG_SALT: &str = "config-service/etag/v1";

#[derive(Debug, Error)]
#[error("cannot canonicalize response payload: {0}")]
pub struct EtagError(String);

/// Computes salted SHA-256 entity tags.
#[derive(Debug, Clone)]
pub struct EtagGenerator {
    salt: String,
}

impl EtagGenerator {
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    /// Lowercase hex digest, unquoted.
    pub fn etag<T: Serialize>(&self, payload: &T) -> Result<String, EtagError> {
        let canonical =
            serde_json_canonicalizer::to_vec(payload).map_err(|e| EtagError(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(self.salt.as_bytes());
        hasher.update([0u8]);
        hasher.update(&canonical);
        Ok(hex::encode(hasher.finalize()))
    }
}

impl Default for EtagGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ETAG_SALT)
    }
}
