//! `reqwest`-backed implementation of [`NodeApi`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::*;

use super::error::{ClientError, ClientResult, ResourceKind};
use super::wire::{ApiErrorBody, BlockResponse};
use super::{ClientConfig, NodeApi};
use crate::block::{Block, BlockId};
use crate::complexity::ComplexityRecord;
use crate::config::{BLOCK_BY_ID_PATH, TRANSACTION_INFO_PATH};
use crate::context::CancelContext;
use crate::crypto::Digest;

/// Longest slice of a non-JSON error body quoted in an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// An `async` client for a node's REST API.
///
/// Holds nothing but the base URL and a pooled `reqwest::Client`, so it is
/// safe to share by reference across concurrent lookups.
#[derive(Debug, Clone)]
pub struct NodeClient {
    /// Base URL without a trailing slash.
    base_url: String,
    /// The underlying HTTP client, carrying the request timeout.
    client: Client,
}

impl NodeClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(ClientError::Builder)?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        trace!(url = %base_url, timeout = ?config.timeout, "created node client");

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, path, id)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        kind: ResourceKind,
        id: &str,
    ) -> ClientResult<T> {
        debug!(%url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                kind,
                id: id.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;

        if !status.is_success() {
            let message = match serde_json::from_slice::<ApiErrorBody>(&body) {
                Ok(api_error) => api_error.describe(),
                Err(_) => String::from_utf8_lossy(&body)
                    .chars()
                    .take(MAX_ERROR_BODY_CHARS)
                    .collect(),
            };
            warn!(%url, %status, %message, "node returned an error status");
            return Err(ClientError::HttpStatus {
                url: url.to_string(),
                status,
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| ClientError::MalformedResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl NodeApi for NodeClient {
    async fn fetch_block(&self, ctx: &CancelContext, block_id: &str) -> ClientResult<Block> {
        let id = BlockId::from_base58(block_id).map_err(|source| ClientError::MalformedId {
            kind: ResourceKind::Block,
            id: block_id.to_string(),
            source,
        })?;

        let url = self.endpoint(BLOCK_BY_ID_PATH, &id.to_base58());
        let response: BlockResponse = ctx
            .run(self.get_json(&url, ResourceKind::Block, block_id))
            .await?;

        let block = response
            .into_block(id)
            .map_err(|reason| ClientError::MalformedResponse {
                url: url.clone(),
                reason,
            })?;

        debug!(
            block = %block.id(),
            generator = %block.generator(),
            transactions = block.transaction_count(),
            "block received"
        );
        Ok(block)
    }

    async fn fetch_complexity(
        &self,
        ctx: &CancelContext,
        tx_id: &Digest,
    ) -> ClientResult<ComplexityRecord> {
        let id = tx_id.to_base58();
        let url = self.endpoint(TRANSACTION_INFO_PATH, &id);
        let record: ComplexityRecord = ctx
            .run(self.get_json(&url, ResourceKind::Transaction, &id))
            .await?;

        if record.id != *tx_id {
            return Err(ClientError::MalformedResponse {
                url,
                reason: format!("requested transaction {id}, node returned {}", record.id),
            });
        }

        trace!(tx = %id, complexity = record.spent_complexity, "complexity received");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client(base: &str) -> NodeClient {
        NodeClient::new(ClientConfig::new(base, Duration::from_secs(1))).unwrap()
    }

    #[test]
    fn test_endpoints_join_without_double_slash() {
        let c = client("http://127.0.0.1:6869/");
        assert_eq!(c.base_url(), "http://127.0.0.1:6869");
        assert_eq!(
            c.endpoint(TRANSACTION_INFO_PATH, "abc"),
            "http://127.0.0.1:6869/transactions/info/abc"
        );
        assert_eq!(
            c.endpoint(BLOCK_BY_ID_PATH, "xyz"),
            "http://127.0.0.1:6869/blocks/signature/xyz"
        );
    }

    #[tokio::test]
    async fn test_malformed_block_id_fails_before_any_request() {
        // Nothing listens on port 9; a request would fail with Transport.
        let c = client("http://127.0.0.1:9");
        let ctx = CancelContext::background();

        let err = c.fetch_block(&ctx, "not base58!").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::MalformedId {
                kind: ResourceKind::Block,
                ..
            }
        ));

        let short = bs58::encode([1u8; 10]).into_string();
        let err = c.fetch_block(&ctx, &short).await.unwrap_err();
        assert!(matches!(err, ClientError::MalformedId { .. }));
    }

    #[tokio::test]
    async fn test_cancelled_context_skips_request() {
        let c = client("http://127.0.0.1:9");
        let (handle, ctx) = crate::context::channel();
        handle.cancel();

        let err = c
            .fetch_complexity(&ctx, &Digest::new([1u8; 32]))
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }
}
