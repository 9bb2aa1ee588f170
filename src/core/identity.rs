//! User identity normalization.
//!
//! The auth provider hands out opaque user ids (`user_2ta6NRH0...`). Storage
//! keys every user-owned row by a UUID derived from that id instead, so the
//! schema does not depend on the provider's id format. The mapping is a
//! SHA-256 digest truncated to 16 bytes and is recomputed on every request;
//! it cannot be reversed.

use crate::errors::{Error, Result};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Maps an external user id to its internal UUID.
///
/// Deterministic and pure. Fails only for an empty or all-whitespace id.
pub fn normalize_user_id(external_id: &str) -> Result<Uuid> {
    if external_id.trim().is_empty() {
        return Err(Error::validation("userId is required"));
    }

    let digest = Sha256::digest(external_id.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    Ok(Uuid::from_bytes(bytes))
}
