//! # Transactions
//!
//! A [`Transaction`] is kept as the JSON object the node returned. Its
//! identifier is the BLAKE2b-256 hash of its body bytes, and the body bytes
//! come in two encodings:
//!
//! - **Legacy binary**: a fixed, per-type field layout. Used by the early
//!   versions of each type (for example transfer v1 and v2, data v1).
//! - **Protobuf**: the unsigned `waves.Transaction` message, which carries
//!   the chain scheme byte as `chain_id`. Used from the version each type
//!   switched over (transfer v3, data v2, invoke v2, ...).
//!
//! ```text
//! id = BLAKE2b-256(body_bytes(scheme))
//! ```
//!
//! Genesis, payment and Ethereum transactions have no body of this kind
//! and are rejected as unsupported.

mod call;
mod fields;
mod legacy;
mod order;
mod proto;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::DIGEST_LENGTH;
use crate::crypto::{blake2b256, Digest};

use fields::Fields;

/// Version assumed for transactions that do not carry a `version` field.
const DEFAULT_VERSION: u8 = 1;

/// Errors produced while building a transaction's body bytes.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("transaction has no numeric 'type' field")]
    MissingType,

    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("unsupported transaction type {tx_type} version {version}")]
    Unsupported { tx_type: u8, version: u8 },
}

impl TransactionError {
    pub(crate) fn invalid(field: &'static str, reason: impl fmt::Display) -> Self {
        Self::InvalidField {
            field,
            reason: reason.to_string(),
        }
    }
}

/// Transaction types whose identifiers can be derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Issue,
    Transfer,
    Reissue,
    Burn,
    Exchange,
    Lease,
    LeaseCancel,
    CreateAlias,
    MassTransfer,
    Data,
    SetScript,
    SponsorFee,
    SetAssetScript,
    InvokeScript,
    UpdateAssetInfo,
}

impl TransactionKind {
    pub fn from_type(tx_type: u8) -> Option<Self> {
        Some(match tx_type {
            3 => Self::Issue,
            4 => Self::Transfer,
            5 => Self::Reissue,
            6 => Self::Burn,
            7 => Self::Exchange,
            8 => Self::Lease,
            9 => Self::LeaseCancel,
            10 => Self::CreateAlias,
            11 => Self::MassTransfer,
            12 => Self::Data,
            13 => Self::SetScript,
            14 => Self::SponsorFee,
            15 => Self::SetAssetScript,
            16 => Self::InvokeScript,
            17 => Self::UpdateAssetInfo,
            _ => return None,
        })
    }

    pub fn type_id(self) -> u8 {
        match self {
            Self::Issue => 3,
            Self::Transfer => 4,
            Self::Reissue => 5,
            Self::Burn => 6,
            Self::Exchange => 7,
            Self::Lease => 8,
            Self::LeaseCancel => 9,
            Self::CreateAlias => 10,
            Self::MassTransfer => 11,
            Self::Data => 12,
            Self::SetScript => 13,
            Self::SponsorFee => 14,
            Self::SetAssetScript => 15,
            Self::InvokeScript => 16,
            Self::UpdateAssetInfo => 17,
        }
    }

    /// First version whose body is the protobuf message.
    pub fn first_protobuf_version(self) -> u8 {
        match self {
            Self::Issue
            | Self::Transfer
            | Self::Reissue
            | Self::Burn
            | Self::Exchange
            | Self::Lease
            | Self::LeaseCancel
            | Self::CreateAlias => 3,
            Self::MassTransfer
            | Self::Data
            | Self::SetScript
            | Self::SponsorFee
            | Self::SetAssetScript
            | Self::InvokeScript => 2,
            Self::UpdateAssetInfo => 1,
        }
    }
}

/// A transaction as returned inside a block by the node API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transaction(Map<String, Value>);

impl Transaction {
    fn fields(&self) -> Fields<'_> {
        Fields::new(&self.0)
    }

    /// Transaction type discriminant.
    pub fn tx_type(&self) -> Result<u8, TransactionError> {
        match self.fields().opt_byte("type") {
            Ok(Some(t)) => Ok(t),
            Ok(None) => Err(TransactionError::MissingType),
            Err(e) => Err(e),
        }
    }

    /// Transaction version, defaulting to 1 when absent.
    pub fn version(&self) -> Result<u8, TransactionError> {
        Ok(self.fields().opt_byte("version")?.unwrap_or(DEFAULT_VERSION))
    }

    /// The identifier the node reported alongside the transaction, if any.
    pub fn reported_id(&self) -> Result<Option<Digest>, TransactionError> {
        match self.fields().opt_text("id")? {
            Some(id) => id
                .parse::<Digest>()
                .map(Some)
                .map_err(|e| TransactionError::invalid("id", e)),
            None => Ok(None),
        }
    }

    /// Body bytes for the given chain scheme byte.
    pub fn body_bytes(&self, scheme: u8) -> Result<Vec<u8>, TransactionError> {
        let tx_type = self.tx_type()?;
        let version = self.version()?;
        let kind = TransactionKind::from_type(tx_type)
            .filter(|_| version > 0)
            .ok_or(TransactionError::Unsupported { tx_type, version })?;

        if version >= kind.first_protobuf_version() {
            proto::body_bytes(kind, version, scheme, self.fields())
        } else {
            legacy::body_bytes(kind, version, scheme, self.fields())
        }
    }

    /// Raw identifier bytes: the BLAKE2b-256 hash of the body bytes.
    pub fn raw_id(&self, scheme: u8) -> Result<[u8; DIGEST_LENGTH], TransactionError> {
        Ok(blake2b256(&self.body_bytes(scheme)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tx(value: Value) -> Transaction {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_version_defaults_to_one() {
        let t = tx(json!({ "type": 3, "fee": 1 }));
        assert_eq!(t.version().unwrap(), 1);
    }

    #[test]
    fn test_missing_type_is_rejected() {
        let t = tx(json!({ "fee": 1 }));
        assert!(matches!(
            t.body_bytes(b'W'),
            Err(TransactionError::MissingType)
        ));
    }

    #[test]
    fn test_out_of_range_type_is_rejected() {
        let t = tx(json!({ "type": 300 }));
        assert!(matches!(
            t.tx_type(),
            Err(TransactionError::InvalidField { field: "type", .. })
        ));
    }

    #[test]
    fn test_genesis_payment_and_ethereum_are_unsupported() {
        for tx_type in [1, 2, 18] {
            let t = tx(json!({ "type": tx_type, "version": 1 }));
            assert!(matches!(
                t.body_bytes(b'W'),
                Err(TransactionError::Unsupported { .. })
            ));
        }
    }

    #[test]
    fn test_version_zero_is_unsupported() {
        let t = tx(json!({ "type": 4, "version": 0 }));
        assert!(matches!(
            t.body_bytes(b'W'),
            Err(TransactionError::Unsupported { tx_type: 4, version: 0 })
        ));
    }

    #[test]
    fn test_protobuf_switchover_versions() {
        assert_eq!(TransactionKind::Transfer.first_protobuf_version(), 3);
        assert_eq!(TransactionKind::Data.first_protobuf_version(), 2);
        assert_eq!(TransactionKind::UpdateAssetInfo.first_protobuf_version(), 1);
        for t in 3..=17 {
            assert_eq!(TransactionKind::from_type(t).unwrap().type_id(), t);
        }
    }

    #[test]
    fn test_reported_id() {
        let id = "2qMiGUpNMuRpeyTnXLa1mLuVP1cYEtxys55cQbDaXd5g";
        assert_eq!(
            tx(json!({ "id": id })).reported_id().unwrap().unwrap().to_base58(),
            id
        );
        assert!(tx(json!({})).reported_id().unwrap().is_none());
        assert!(tx(json!({ "id": "0OIl" })).reported_id().is_err());
    }

    #[test]
    fn test_missing_body_field_is_named() {
        let t = tx(json!({ "type": 4, "version": 3, "fee": 1, "timestamp": 1 }));
        assert!(matches!(
            t.body_bytes(b'W'),
            Err(TransactionError::MissingField("senderPublicKey"))
        ));
    }
}
