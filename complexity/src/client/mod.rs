//! # Node Client
//!
//! The two node API calls the scanner needs, behind the [`NodeApi`] trait:
//!
//! | Call               | Endpoint                              |
//! |--------------------|---------------------------------------|
//! | `fetch_block`      | `GET {base}/blocks/signature/{id}`    |
//! | `fetch_complexity` | `GET {base}/transactions/info/{id}`   |
//!
//! [`NodeClient`] is the HTTP implementation. Every call takes a
//! [`CancelContext`] and returns [`ClientError::Cancelled`] as soon as it
//! fires; the per-request timeout lives in the underlying `reqwest::Client`.
//! The client keeps no state between calls beyond its configuration.

mod error;
mod http;
mod wire;

use std::time::Duration;

use async_trait::async_trait;

use crate::block::Block;
use crate::complexity::ComplexityRecord;
use crate::config::USER_AGENT;
use crate::context::CancelContext;
use crate::crypto::Digest;

pub use error::{ClientError, ClientResult, ResourceKind};
pub use http::NodeClient;

/// Read access to a node's block and transaction data.
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// Fetch a block by its base58 id.
    async fn fetch_block(&self, ctx: &CancelContext, block_id: &str) -> ClientResult<Block>;

    /// Fetch the spent complexity of a transaction.
    async fn fetch_complexity(
        &self,
        ctx: &CancelContext,
        tx_id: &Digest,
    ) -> ClientResult<ComplexityRecord>;
}

/// Construction parameters for [`NodeClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Resolved base URL, see [`crate::endpoint::resolve`].
    pub base_url: String,
    /// Per-request timeout, covering connect through body read.
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

