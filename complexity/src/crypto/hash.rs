//! # Hashing Utilities
//!
//! The network identifies transactions and v5 blocks by the BLAKE2b-256
//! digest of their body bytes. This module wraps the `blake2` crate so the
//! rest of the code only ever sees fixed-size `[u8; 32]` arrays.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest as _};

use crate::config::DIGEST_LENGTH;

type Blake2b256 = Blake2b<U32>;

/// Compute the BLAKE2b-256 hash of the input data.
///
/// # Example
///
/// ```
/// use waves_complexity::crypto::blake2b256;
///
/// let hash = blake2b256(b"waves");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn blake2b256(data: &[u8]) -> [u8; DIGEST_LENGTH] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; DIGEST_LENGTH];
    output.copy_from_slice(&result);
    output
}
