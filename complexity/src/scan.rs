//! End-to-end scan of a single block: fetch, derive, look up, sum.

use thiserror::Error;
use tracing::info;

use crate::aggregate::{aggregate, AggregateError};
use crate::block::Block;
use crate::client::{ClientError, NodeApi};
use crate::complexity::AggregateResult;
use crate::config::network_name;
use crate::context::CancelContext;

/// Errors that abort a block scan. Each names the step that failed.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to get block with ID '{block_id}'")]
    Block {
        block_id: String,
        #[source]
        source: ClientError,
    },

    #[error("failed to get transactions complexities")]
    Complexities(#[source] AggregateError),
}

impl ScanError {
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Block { source, .. } => source.is_cancelled(),
            Self::Complexities(source) => source.is_cancelled(),
        }
    }
}

/// Outcome of a successful scan.
#[derive(Debug, Clone)]
pub struct BlockComplexity {
    pub block: Block,
    /// Scheme byte taken from the block generator's address.
    pub scheme: u8,
    pub result: AggregateResult,
}

/// Fetch `block_id` from `node` and aggregate its transactions' complexity.
pub async fn scan_block<N>(
    ctx: &CancelContext,
    node: &N,
    block_id: &str,
    concurrency: usize,
) -> Result<BlockComplexity, ScanError>
where
    N: NodeApi + ?Sized,
{
    let block = node
        .fetch_block(ctx, block_id)
        .await
        .map_err(|source| ScanError::Block {
            block_id: block_id.to_string(),
            source,
        })?;

    let scheme = block.scheme();
    info!(
        block = %block.id(),
        network = %network_name(scheme),
        transactions = block.transaction_count(),
        "block fetched"
    );

    let result = aggregate(ctx, node, &block, scheme, concurrency)
        .await
        .map_err(ScanError::Complexities)?;

    Ok(BlockComplexity {
        block,
        scheme,
        result,
    })
}
