//! Platform message signatures.
//!
//! The remote platform signs `(token, timestamp, nonce, body)` by sorting the
//! four strings bytewise, concatenating them without a separator and taking
//! the lowercase hex SHA-1 of the result.

use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

use crate::error::CryptoError;

/// Compute the signature the platform expects for a payload.
pub fn sign(token: &str, timestamp: &str, nonce: &str, body: &str) -> String {
    let mut parts = [token, timestamp, nonce, body];
    parts.sort_unstable_by(|a, b| a.as_bytes().cmp(b.as_bytes()));

    let mut hasher = Sha1::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Recompute and compare in constant time.
pub fn verify(token: &str, timestamp: &str, nonce: &str, body: &str, signature: &str) -> bool {
    let expected = sign(token, timestamp, nonce, body);
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}

/// [`verify`], surfaced as a typed error for `?` chains.
pub fn ensure_valid(
    token: &str,
    timestamp: &str,
    nonce: &str,
    body: &str,
    signature: &str,
) -> Result<(), CryptoError> {
    if verify(token, timestamp, nonce, body, signature) {
        Ok(())
    } else {
        Err(CryptoError::Authentication)
    }
}
