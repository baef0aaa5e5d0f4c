//! # Cryptographic Primitives
//!
//! Thin, type-safe wrappers around the digest machinery the node uses:
//!
//! - **BLAKE2b-256** for transaction identifiers.
//! - **Base58** for every identifier that crosses the HTTP boundary.
//!
//! Nothing here verifies signatures. The scanner trusts the node it talks to.

pub mod digest;
pub mod hash;

pub use digest::{Digest, DigestError};
pub use hash::blake2b256;
