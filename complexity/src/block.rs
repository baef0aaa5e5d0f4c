//! # Block Structure
//!
//! The subset of a block the scanner cares about: which block it is, who
//! generated it, and the ordered transactions it carries.
//!
//! ## Generator Address Layout
//!
//! ```text
//! ┌─────────┬────────┬──────────────────────┬──────────┐
//! │ version │ scheme │ public key hash (20) │ checksum │
//! │   (1)   │  (1)   │                      │   (4)    │
//! └─────────┴────────┴──────────────────────┴──────────┘
//! ```
//!
//! The scheme byte at offset 1 names the chain (`W` mainnet, `T` testnet,
//! `S` stagenet) and is the input to transaction identifier derivation.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::config::{
    ADDRESS_LENGTH, ADDRESS_SCHEME_OFFSET, ADDRESS_VERSION, BLOCK_SIGNATURE_LENGTH, DIGEST_LENGTH,
};
use crate::transaction::Transaction;

// ---------------------------------------------------------------------------
// BlockId
// ---------------------------------------------------------------------------

/// Errors produced while decoding a block id.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlockIdError {
    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    #[error("invalid length {actual}: expected 32 or 64 bytes")]
    InvalidLength { actual: usize },
}

/// Identifier of a block: a 32-byte hash for v5 blocks, or the 64-byte
/// generator signature for legacy ones.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BlockId(Vec<u8>);

impl BlockId {
    pub fn from_base58(s: &str) -> Result<Self, BlockIdError> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| BlockIdError::InvalidBase58(e.to_string()))?;
        match bytes.len() {
            DIGEST_LENGTH | BLOCK_SIGNATURE_LENGTH => Ok(Self(bytes)),
            actual => Err(BlockIdError::InvalidLength { actual }),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }
}

impl FromStr for BlockId {
    type Err = BlockIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({})", self.to_base58())
    }
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    #[error("invalid address length: expected 26 bytes, got {0}")]
    InvalidLength(usize),

    #[error("unsupported address version {0}")]
    UnsupportedVersion(u8),
}

/// Raw account address bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AddressError> {
        let array: [u8; ADDRESS_LENGTH] = bytes
            .try_into()
            .map_err(|_| AddressError::InvalidLength(bytes.len()))?;
        if array[0] != ADDRESS_VERSION {
            return Err(AddressError::UnsupportedVersion(array[0]));
        }
        Ok(Self(array))
    }

    pub fn from_base58(s: &str) -> Result<Self, AddressError> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| AddressError::InvalidBase58(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// The chain scheme byte embedded in the address.
    pub fn scheme(&self) -> u8 {
        self.0[ADDRESS_SCHEME_OFFSET]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// A block fetched from the node.
///
/// Immutable after construction. The transaction count is the length of
/// the transaction list by construction; a node response that declares a
/// different count is rejected before a `Block` is ever built.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    id: BlockId,
    generator: Address,
    transactions: Vec<Transaction>,
}

impl Block {
    pub fn new(id: BlockId, generator: Address, transactions: Vec<Transaction>) -> Self {
        Self {
            id,
            generator,
            transactions,
        }
    }

    pub fn id(&self) -> &BlockId {
        &self.id
    }

    pub fn generator(&self) -> &Address {
        &self.generator
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Scheme byte of the generator address, used for every transaction
    /// identifier in this block.
    pub fn scheme(&self) -> u8 {
        self.generator.scheme()
    }
}
