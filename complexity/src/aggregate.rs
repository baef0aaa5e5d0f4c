//! # Complexity Aggregation
//!
//! Fans one complexity lookup out per transaction and folds the answers
//! back into block order.
//!
//! ```text
//! derive_ids ──► [id0, id1, id2, …]
//!                  │    │    │
//!                  ▼    ▼    ▼        at most `concurrency` in flight
//!           fetch_complexity × N
//!                  │    │    │
//!                  ▼    ▼    ▼        merged by position, not completion
//!           [rec0, rec1, rec2, …] ──► AggregateResult { records, total }
//! ```
//!
//! Fail-fast: the first failed lookup (in block order) ends the run, the
//! remaining requests are dropped and no partial result escapes.

use futures::{stream, StreamExt, TryStreamExt};
use thiserror::Error;
use tracing::{debug, info};

use crate::block::Block;
use crate::client::{ClientError, NodeApi};
use crate::complexity::{AggregateResult, ComplexityRecord};
use crate::context::CancelContext;
use crate::crypto::Digest;
use crate::derive::{derive_ids, DerivationError};

/// Errors that abort an aggregation.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("failed to derive transaction ids")]
    Derivation(#[from] DerivationError),

    #[error("complexity lookup for transaction #{index} ({id}) failed")]
    Lookup {
        index: usize,
        id: Digest,
        #[source]
        source: ClientError,
    },
}

impl AggregateError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Lookup { source, .. } if source.is_cancelled())
    }
}

/// Fetch and sum the spent complexity of every transaction in `block`.
///
/// `concurrency` bounds the number of lookups in flight; `1` gives the
/// strictly sequential behavior and `0` is treated as `1`.
pub async fn aggregate<N>(
    ctx: &CancelContext,
    node: &N,
    block: &Block,
    scheme: u8,
    concurrency: usize,
) -> Result<AggregateResult, AggregateError>
where
    N: NodeApi + ?Sized,
{
    let ids = derive_ids(block, scheme)?;
    if ids.is_empty() {
        debug!(block = %block.id(), "block has no transactions");
        return Ok(AggregateResult::default());
    }

    let limit = concurrency.max(1);
    debug!(transactions = ids.len(), limit, "looking up complexities");

    let records: Vec<ComplexityRecord> = stream::iter(ids.iter().copied().enumerate())
        .map(|(index, id)| async move {
            node.fetch_complexity(ctx, &id)
                .await
                .map_err(|source| AggregateError::Lookup { index, id, source })
        })
        .buffered(limit)
        .try_collect()
        .await?;

    debug_assert_eq!(records.len(), block.transaction_count());

    let result = AggregateResult::new(records);
    info!(
        block = %block.id(),
        transactions = result.records().len(),
        total = %result.total(),
        "complexity aggregated"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Address, BlockId};
    use crate::client::{ClientResult, ResourceKind};
    use crate::context;
    use crate::transaction::Transaction;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory node: answers complexity lookups from a map.
    #[derive(Default)]
    struct FakeNode {
        complexities: HashMap<Digest, u64>,
        failing: Option<Digest>,
        /// Per-id artificial latency.
        delays: HashMap<Digest, Duration>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl NodeApi for FakeNode {
        async fn fetch_block(&self, _ctx: &CancelContext, block_id: &str) -> ClientResult<Block> {
            Err(ClientError::NotFound {
                kind: ResourceKind::Block,
                id: block_id.to_string(),
            })
        }

        async fn fetch_complexity(
            &self,
            ctx: &CancelContext,
            tx_id: &Digest,
        ) -> ClientResult<ComplexityRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let delay = self.delays.get(tx_id).copied().unwrap_or_default();
            let result = ctx
                .run(async {
                    tokio::time::sleep(delay).await;
                    if self.failing == Some(*tx_id) {
                        return Err(ClientError::MalformedResponse {
                            url: format!("fake://transactions/info/{tx_id}"),
                            reason: "simulated transport failure".into(),
                        });
                    }
                    let spent = self.complexities.get(tx_id).copied().ok_or_else(|| {
                        ClientError::NotFound {
                            kind: ResourceKind::Transaction,
                            id: tx_id.to_string(),
                        }
                    })?;
                    Ok::<_, ClientError>(ComplexityRecord::new(*tx_id, spent))
                })
                .await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }

    fn block_of(n: usize) -> Block {
        let mut generator = [0x22u8; 26];
        generator[0] = 1;
        generator[1] = b'T';
        let transactions = (0..n)
            .map(|i| {
                serde_json::from_value::<Transaction>(json!({
                    "type": 4,
                    "version": 3,
                    "senderPublicKey": "FM5ojNqW7e9cZ9zhPYGkpSP1Pcd8Z3e3MNKYVS5pGJ8Z",
                    "recipient": "3My3KZgFQ3CrVHgz6vGRt8687sH4oAA1qp8",
                    "amount": 1_000 + i,
                    "fee": 100_000,
                    "timestamp": 1_690_000_000_000u64
                }))
                .unwrap()
            })
            .collect();
        Block::new(
            BlockId::from_base58(&bs58::encode([7u8; 64]).into_string()).unwrap(),
            Address::from_bytes(&generator).unwrap(),
            transactions,
        )
    }

    fn node_for(block: &Block, complexities: &[u64]) -> (FakeNode, Vec<Digest>) {
        let ids = derive_ids(block, block.scheme()).unwrap();
        let node = FakeNode {
            complexities: ids.iter().copied().zip(complexities.iter().copied()).collect(),
            ..FakeNode::default()
        };
        (node, ids)
    }

    #[tokio::test]
    async fn test_sums_fixture_in_block_order() {
        let block = block_of(5);
        let (node, ids) = node_for(&block, &[0, 3, 0, 12, 7]);
        let ctx = CancelContext::background();

        let result = aggregate(&ctx, &node, &block, block.scheme(), 1)
            .await
            .unwrap();

        assert_eq!(result.total(), 22);
        assert_eq!(result.records().len(), 5);
        let got: Vec<Digest> = result.records().iter().map(|r| r.id).collect();
        assert_eq!(got, ids);
        let spent: Vec<u64> = result.records().iter().map(|r| r.spent_complexity).collect();
        assert_eq!(spent, vec![0, 3, 0, 12, 7]);
        assert_eq!(result.non_zero().count(), 3);
        assert_eq!(node.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_empty_block_makes_no_lookups() {
        let block = block_of(0);
        let node = FakeNode::default();
        let ctx = CancelContext::background();

        let result = aggregate(&ctx, &node, &block, block.scheme(), 8)
            .await
            .unwrap();

        assert!(result.records().is_empty());
        assert_eq!(result.total(), 0);
        assert_eq!(node.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sequential_lookup_fails_fast() {
        let block = block_of(5);
        let (mut node, ids) = node_for(&block, &[1, 2, 3, 4, 5]);
        node.failing = Some(ids[2]);
        let ctx = CancelContext::background();

        let err = aggregate(&ctx, &node, &block, block.scheme(), 1)
            .await
            .unwrap_err();

        match err {
            AggregateError::Lookup { index, id, source } => {
                assert_eq!(index, 2);
                assert_eq!(id, ids[2]);
                assert!(source.is_transport());
            }
            other => panic!("unexpected error: {other}"),
        }
        // Transactions 4 and 5 are never queried.
        assert_eq!(node.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_lookup_fails_without_partial_result() {
        let block = block_of(5);
        let (mut node, ids) = node_for(&block, &[1, 2, 3, 4, 5]);
        node.failing = Some(ids[2]);
        // Later transactions finish first.
        for (i, id) in ids.iter().enumerate() {
            node.delays.insert(*id, Duration::from_millis(100 - 20 * i as u64));
        }
        let ctx = CancelContext::background();

        let err = aggregate(&ctx, &node, &block, block.scheme(), 4)
            .await
            .unwrap_err();
        assert!(matches!(err, AggregateError::Lookup { index: 2, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_results_keep_block_order() {
        let block = block_of(8);
        let complexities = [5, 0, 9, 1, 0, 0, 4, 2];
        let (mut node, ids) = node_for(&block, &complexities);
        for (i, id) in ids.iter().enumerate() {
            node.delays.insert(*id, Duration::from_millis(10 * (8 - i as u64)));
        }
        let ctx = CancelContext::background();

        let result = aggregate(&ctx, &node, &block, block.scheme(), 3)
            .await
            .unwrap();

        let got: Vec<Digest> = result.records().iter().map(|r| r.id).collect();
        assert_eq!(got, ids);
        assert_eq!(result.total(), 21);
        assert!(node.max_in_flight.load(Ordering::SeqCst) <= 3);
        assert!(node.max_in_flight.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_sequential() {
        let block = block_of(3);
        let (node, _) = node_for(&block, &[1, 1, 1]);
        let ctx = CancelContext::background();

        let result = aggregate(&ctx, &node, &block, block.scheme(), 0)
            .await
            .unwrap();
        assert_eq!(result.total(), 3);
        assert_eq!(node.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_mid_run() {
        let block = block_of(5);
        let (mut node, ids) = node_for(&block, &[1, 2, 3, 4, 5]);
        for id in &ids {
            node.delays.insert(*id, Duration::from_secs(10));
        }
        let (handle, ctx) = context::channel();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(15)).await;
            handle.cancel();
        });

        let err = aggregate(&ctx, &node, &block, block.scheme(), 1)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert!(matches!(err, AggregateError::Lookup { index: 1, .. }));
    }

    #[tokio::test]
    async fn test_derivation_failure_aborts_before_lookups() {
        let mut generator = [0x22u8; 26];
        generator[0] = 1;
        generator[1] = b'W';
        let genesis: Transaction = serde_json::from_value(json!({
            "type": 1,
            "recipient": "3PAWwWa6GbwcJaFzwqXQN5KQm7H96Y7SHTQ",
            "amount": 1,
            "timestamp": 1
        }))
        .unwrap();
        let block = Block::new(
            BlockId::from_base58(&bs58::encode([7u8; 32]).into_string()).unwrap(),
            Address::from_bytes(&generator).unwrap(),
            vec![genesis],
        );
        let node = FakeNode::default();
        let ctx = CancelContext::background();

        let err = aggregate(&ctx, &node, &block, block.scheme(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AggregateError::Derivation(_)));
        assert!(!err.is_cancelled());
        assert_eq!(node.calls.load(Ordering::SeqCst), 0);
    }
}
