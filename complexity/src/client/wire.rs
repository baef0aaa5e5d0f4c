//! JSON shapes returned by the node REST API.

use serde::Deserialize;

use crate::block::{Address, Block, BlockId};
use crate::transaction::Transaction;

/// `GET /blocks/signature/{id}` response, reduced to the fields we read.
///
/// v5 blocks carry both `id` (header hash) and `signature`; legacy blocks
/// are identified by `signature` alone.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BlockResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
    pub generator: String,
    pub transaction_count: usize,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl BlockResponse {
    /// Validate the response against the requested id and build a [`Block`].
    ///
    /// Errors are plain reasons; the caller attaches the URL.
    pub fn into_block(self, requested: BlockId) -> Result<Block, String> {
        let requested_b58 = requested.to_base58();
        let reported: Vec<&str> = [self.id.as_deref(), self.signature.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !reported.is_empty() && !reported.contains(&requested_b58.as_str()) {
            return Err(format!(
                "requested block {requested_b58}, node returned {}",
                reported.join(" / ")
            ));
        }

        if self.transaction_count != self.transactions.len() {
            return Err(format!(
                "transactionCount is {} but {} transactions were returned",
                self.transaction_count,
                self.transactions.len()
            ));
        }

        let generator = Address::from_base58(&self.generator)
            .map_err(|e| format!("invalid generator address '{}': {e}", self.generator))?;

        Ok(Block::new(requested, generator, self.transactions))
    }
}

/// Error body the node attaches to non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<i64>,
    pub message: String,
}

impl ApiErrorBody {
    pub fn describe(&self) -> String {
        match self.error {
            Some(code) => format!("{} (code {code})", self.message),
            None => self.message.clone(),
        }
    }
}
