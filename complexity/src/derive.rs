//! # Transaction Identifier Derivation
//!
//! Computes the canonical identifier of every transaction in a block. The
//! scheme byte comes from the block generator's address (byte index 1) and
//! is applied to all of the block's transactions.
//!
//! When the node reports an `id` next to a transaction, the derived
//! identifier must match it. A disagreement means the body encoding is wrong
//! for that transaction, and the lookup would ask about the wrong id.
//!
//! Output order is block order. Downstream aggregation attributes each
//! complexity record to the transaction at the same position.

use thiserror::Error;

use crate::block::Block;
use crate::crypto::Digest;
use crate::transaction::TransactionError;

/// Errors produced while deriving transaction identifiers.
#[derive(Debug, Error)]
pub enum DerivationError {
    /// The transaction's canonical body could not be built.
    #[error("cannot build the body of transaction #{index}")]
    Body {
        index: usize,
        #[source]
        source: TransactionError,
    },

    /// The derived identifier differs from the one the node reported.
    #[error("derived id {derived} of transaction #{index} does not match reported id {reported}")]
    Mismatch {
        index: usize,
        derived: Digest,
        reported: Digest,
    },
}

impl DerivationError {
    /// Position of the offending transaction within its block.
    pub fn index(&self) -> usize {
        match self {
            Self::Body { index, .. } | Self::Mismatch { index, .. } => *index,
        }
    }
}

/// Derive the identifiers of all transactions in `block`, in block order.
pub fn derive_ids(block: &Block, scheme: u8) -> Result<Vec<Digest>, DerivationError> {
    block
        .transactions()
        .iter()
        .enumerate()
        .map(|(index, tx)| {
            let body = |source| DerivationError::Body { index, source };
            let derived = Digest::from(tx.raw_id(scheme).map_err(body)?);
            match tx.reported_id().map_err(body)? {
                Some(reported) if reported != derived => Err(DerivationError::Mismatch {
                    index,
                    derived,
                    reported,
                }),
                _ => Ok(derived),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Address, BlockId};
    use crate::transaction::Transaction;
    use serde_json::{json, Value};

    const SENDER: &str = "FM5ojNqW7e9cZ9zhPYGkpSP1Pcd8Z3e3MNKYVS5pGJ8Z";
    const RECIPIENT: &str = "3My3KZgFQ3CrVHgz6vGRt8687sH4oAA1qp8";
    const TRANSFER_V1_ID: &str = "FLszEaqasJptohmP6zrXodBwjaEYq4jRP2BzdPPjvukk";
    const TRANSFER_V2_ID: &str = "2qMiGUpNMuRpeyTnXLa1mLuVP1cYEtxys55cQbDaXd5g";
    const DATA_V1_ID: &str = "87SfuGJXH1cki2RGDH7WMTGnTXeunkc5mEjNKmmMdRzM";

    fn tx(value: Value) -> Transaction {
        serde_json::from_value(value).unwrap()
    }

    fn testnet_block(transactions: Vec<Transaction>) -> Block {
        Block::new(
            BlockId::from_base58(&bs58::encode([2u8; 32]).into_string()).unwrap(),
            Address::from_base58("3N5GRqzDBhjVXnCn44baHcz2GoZy5qLxtTh").unwrap(),
            transactions,
        )
    }

    fn transfer_v1() -> Value {
        json!({
            "type": 4,
            "version": 1,
            "senderPublicKey": SENDER,
            "recipient": RECIPIENT,
            "assetId": null,
            "feeAssetId": null,
            "amount": 1_900_000,
            "fee": 100_000,
            "timestamp": 1_526_552_510_868u64,
            "attachment": "4t2Xazb2SX",
        })
    }

    fn transfer_v2() -> Value {
        json!({
            "type": 4,
            "version": 2,
            "senderPublicKey": SENDER,
            "recipient": RECIPIENT,
            "assetId": null,
            "feeAssetId": null,
            "amount": 100_000_000,
            "fee": 100_000_000,
            "timestamp": 1_526_641_218_066u64,
            "attachment": "4t2Xazb2SX",
        })
    }

    fn data_v1() -> Value {
        json!({
            "type": 12,
            "version": 1,
            "senderPublicKey": SENDER,
            "data": [
                { "key": "int", "type": "integer", "value": 24 },
                { "key": "bool", "type": "boolean", "value": true },
                { "key": "blob", "type": "binary", "value": "base64:YWxpY2U=" },
            ],
            "fee": 100_000,
            "timestamp": 1_526_911_531_530u64,
        })
    }

    #[test]
    fn test_published_ids_in_block_order() {
        let block = testnet_block(vec![tx(transfer_v1()), tx(transfer_v2()), tx(data_v1())]);
        let ids: Vec<String> = derive_ids(&block, block.scheme())
            .unwrap()
            .iter()
            .map(Digest::to_base58)
            .collect();
        assert_eq!(ids, [TRANSFER_V1_ID, TRANSFER_V2_ID, DATA_V1_ID]);
    }

    #[test]
    fn test_matching_reported_id_is_accepted() {
        let mut value = transfer_v2();
        value["id"] = json!(TRANSFER_V2_ID);
        let block = testnet_block(vec![tx(value)]);
        assert_eq!(derive_ids(&block, b'T').unwrap()[0].to_base58(), TRANSFER_V2_ID);
    }

    #[test]
    fn test_mismatched_reported_id_is_rejected() {
        let mut value = transfer_v2();
        value["id"] = json!(TRANSFER_V1_ID);
        let block = testnet_block(vec![tx(transfer_v1()), tx(value)]);
        match derive_ids(&block, b'T').unwrap_err() {
            DerivationError::Mismatch {
                index,
                derived,
                reported,
            } => {
                assert_eq!(index, 1);
                assert_eq!(derived.to_base58(), TRANSFER_V2_ID);
                assert_eq!(reported.to_base58(), TRANSFER_V1_ID);
            }
            other => panic!("expected a mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_reported_id_fails_the_body() {
        let mut value = transfer_v1();
        value["id"] = json!("not base58 0OIl");
        let block = testnet_block(vec![tx(value)]);
        assert!(matches!(
            derive_ids(&block, b'T').unwrap_err(),
            DerivationError::Body { index: 0, .. }
        ));
    }

    #[test]
    fn test_legacy_ids_ignore_the_scheme() {
        let block = testnet_block(vec![tx(transfer_v1())]);
        assert_eq!(
            derive_ids(&block, b'W').unwrap(),
            derive_ids(&block, b'T').unwrap()
        );
    }

    #[test]
    fn test_protobuf_ids_depend_on_the_scheme() {
        let mut value = transfer_v2();
        value["version"] = json!(3);
        let block = testnet_block(vec![tx(value)]);
        assert_ne!(
            derive_ids(&block, b'W').unwrap(),
            derive_ids(&block, b'T').unwrap()
        );
    }

    #[test]
    fn test_empty_block_yields_no_ids() {
        let block = testnet_block(Vec::new());
        assert!(derive_ids(&block, b'W').unwrap().is_empty());
    }

    #[test]
    fn test_unsupported_type_reports_transaction_index() {
        let genesis = tx(json!({
            "type": 1,
            "recipient": RECIPIENT,
            "amount": 1,
            "timestamp": 1,
        }));
        let block = testnet_block(vec![tx(transfer_v1()), tx(transfer_v2()), genesis]);
        let err = derive_ids(&block, b'T').unwrap_err();
        assert_eq!(err.index(), 2);
        assert!(matches!(
            err,
            DerivationError::Body {
                source: TransactionError::Unsupported { tx_type: 1, .. },
                ..
            }
        ));
    }
}
