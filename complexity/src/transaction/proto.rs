//! Protobuf transaction bodies.
//!
//! Hand-declared `prost` messages mirroring the unsigned `waves.Transaction`
//! schema. Only the fields that take part in the body are declared. Field
//! tags must match the published schema exactly; default scalars are
//! omitted from the encoding as proto3 requires.

use prost::Message;

use super::call;
use super::fields::{decode_base64, Fields, Recipient as JsonRecipient};
use super::order::Order as JsonOrder;
use super::{TransactionError, TransactionKind};

type Result<T> = std::result::Result<T, TransactionError>;

/// Bytes 2..22 of an address: the public key hash.
const PUBLIC_KEY_HASH: std::ops::Range<usize> = 2..22;

#[derive(Clone, PartialEq, Message)]
pub struct Transaction {
    #[prost(int32, tag = "1")]
    pub chain_id: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub sender_public_key: Vec<u8>,
    #[prost(message, optional, tag = "3")]
    pub fee: Option<Amount>,
    #[prost(int64, tag = "4")]
    pub timestamp: i64,
    #[prost(int32, tag = "5")]
    pub version: i32,
    #[prost(
        oneof = "transaction::Data",
        tags = "103, 104, 105, 106, 107, 108, 109, 110, 111, 112, 113, 114, 115, 116, 117"
    )]
    pub data: Option<transaction::Data>,
}

pub mod transaction {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Data {
        #[prost(message, tag = "103")]
        Issue(super::IssueData),
        #[prost(message, tag = "104")]
        Transfer(super::TransferData),
        #[prost(message, tag = "105")]
        Reissue(super::ReissueData),
        #[prost(message, tag = "106")]
        Burn(super::BurnData),
        #[prost(message, tag = "107")]
        Exchange(super::ExchangeData),
        #[prost(message, tag = "108")]
        Lease(super::LeaseData),
        #[prost(message, tag = "109")]
        LeaseCancel(super::LeaseCancelData),
        #[prost(message, tag = "110")]
        CreateAlias(super::CreateAliasData),
        #[prost(message, tag = "111")]
        MassTransfer(super::MassTransferData),
        #[prost(message, tag = "112")]
        DataTransaction(super::DataData),
        #[prost(message, tag = "113")]
        SetScript(super::SetScriptData),
        #[prost(message, tag = "114")]
        SponsorFee(super::SponsorFeeData),
        #[prost(message, tag = "115")]
        SetAssetScript(super::SetAssetScriptData),
        #[prost(message, tag = "116")]
        InvokeScript(super::InvokeScriptData),
        #[prost(message, tag = "117")]
        UpdateAssetInfo(super::UpdateAssetInfoData),
    }
}

/// An amount of an asset. An empty `asset_id` is the native token.
#[derive(Clone, PartialEq, Message)]
pub struct Amount {
    #[prost(bytes = "vec", tag = "1")]
    pub asset_id: Vec<u8>,
    #[prost(int64, tag = "2")]
    pub amount: i64,
}

#[derive(Clone, PartialEq, Message)]
pub struct Recipient {
    #[prost(oneof = "recipient::Recipient", tags = "1, 2")]
    pub recipient: Option<recipient::Recipient>,
}

pub mod recipient {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Recipient {
        #[prost(bytes, tag = "1")]
        PublicKeyHash(Vec<u8>),
        #[prost(string, tag = "2")]
        Alias(String),
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct IssueData {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub description: String,
    #[prost(int64, tag = "3")]
    pub amount: i64,
    #[prost(int32, tag = "4")]
    pub decimals: i32,
    #[prost(bool, tag = "5")]
    pub reissuable: bool,
    #[prost(bytes = "vec", tag = "6")]
    pub script: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct TransferData {
    #[prost(message, optional, tag = "1")]
    pub recipient: Option<Recipient>,
    #[prost(message, optional, tag = "2")]
    pub amount: Option<Amount>,
    #[prost(bytes = "vec", tag = "3")]
    pub attachment: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct ReissueData {
    #[prost(message, optional, tag = "1")]
    pub asset_amount: Option<Amount>,
    #[prost(bool, tag = "2")]
    pub reissuable: bool,
}

#[derive(Clone, PartialEq, Message)]
pub struct BurnData {
    #[prost(message, optional, tag = "1")]
    pub asset_amount: Option<Amount>,
}

#[derive(Clone, PartialEq, Message)]
pub struct ExchangeData {
    #[prost(int64, tag = "1")]
    pub amount: i64,
    #[prost(int64, tag = "2")]
    pub price: i64,
    #[prost(int64, tag = "3")]
    pub buy_matcher_fee: i64,
    #[prost(int64, tag = "4")]
    pub sell_matcher_fee: i64,
    #[prost(message, repeated, tag = "5")]
    pub orders: Vec<Order>,
}

#[derive(Clone, PartialEq, Message)]
pub struct LeaseData {
    #[prost(message, optional, tag = "1")]
    pub recipient: Option<Recipient>,
    #[prost(int64, tag = "2")]
    pub amount: i64,
}

#[derive(Clone, PartialEq, Message)]
pub struct LeaseCancelData {
    #[prost(bytes = "vec", tag = "1")]
    pub lease_id: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct CreateAliasData {
    #[prost(string, tag = "1")]
    pub alias: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct MassTransferData {
    #[prost(bytes = "vec", tag = "1")]
    pub asset_id: Vec<u8>,
    #[prost(message, repeated, tag = "2")]
    pub transfers: Vec<MassTransferEntry>,
    #[prost(bytes = "vec", tag = "3")]
    pub attachment: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct MassTransferEntry {
    #[prost(message, optional, tag = "1")]
    pub recipient: Option<Recipient>,
    #[prost(int64, tag = "2")]
    pub amount: i64,
}

#[derive(Clone, PartialEq, Message)]
pub struct DataData {
    #[prost(message, repeated, tag = "1")]
    pub data: Vec<DataEntry>,
}

/// A data entry. No value means the key is deleted.
#[derive(Clone, PartialEq, Message)]
pub struct DataEntry {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(oneof = "data_entry::Value", tags = "10, 11, 12, 13")]
    pub value: Option<data_entry::Value>,
}

pub mod data_entry {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Value {
        #[prost(int64, tag = "10")]
        IntValue(i64),
        #[prost(bool, tag = "11")]
        BoolValue(bool),
        #[prost(bytes, tag = "12")]
        BinaryValue(Vec<u8>),
        #[prost(string, tag = "13")]
        StringValue(String),
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct SetScriptData {
    #[prost(bytes = "vec", tag = "1")]
    pub script: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct SponsorFeeData {
    #[prost(message, optional, tag = "1")]
    pub min_fee: Option<Amount>,
}

#[derive(Clone, PartialEq, Message)]
pub struct SetAssetScriptData {
    #[prost(bytes = "vec", tag = "1")]
    pub asset_id: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub script: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct InvokeScriptData {
    #[prost(message, optional, tag = "1")]
    pub d_app: Option<Recipient>,
    #[prost(bytes = "vec", tag = "2")]
    pub function_call: Vec<u8>,
    #[prost(message, repeated, tag = "3")]
    pub payments: Vec<Amount>,
}

#[derive(Clone, PartialEq, Message)]
pub struct UpdateAssetInfoData {
    #[prost(bytes = "vec", tag = "1")]
    pub asset_id: Vec<u8>,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub description: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct AssetPair {
    #[prost(bytes = "vec", tag = "1")]
    pub amount_asset_id: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub price_asset_id: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Order {
    #[prost(int32, tag = "1")]
    pub chain_id: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub sender_public_key: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub matcher_public_key: Vec<u8>,
    #[prost(message, optional, tag = "4")]
    pub asset_pair: Option<AssetPair>,
    #[prost(enumeration = "order::Side", tag = "5")]
    pub order_side: i32,
    #[prost(int64, tag = "6")]
    pub amount: i64,
    #[prost(int64, tag = "7")]
    pub price: i64,
    #[prost(int64, tag = "8")]
    pub timestamp: i64,
    #[prost(int64, tag = "9")]
    pub expiration: i64,
    #[prost(message, optional, tag = "10")]
    pub matcher_fee: Option<Amount>,
    #[prost(int32, tag = "11")]
    pub version: i32,
    #[prost(bytes = "vec", repeated, tag = "12")]
    pub proofs: Vec<Vec<u8>>,
    #[prost(enumeration = "order::PriceMode", tag = "14")]
    pub price_mode: i32,
    #[prost(bytes = "vec", tag = "15")]
    pub attachment: Vec<u8>,
}

pub mod order {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
    #[repr(i32)]
    pub enum Side {
        Buy = 0,
        Sell = 1,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
    #[repr(i32)]
    pub enum PriceMode {
        Default = 0,
        FixedDecimals = 1,
        AssetDecimals = 2,
    }
}

pub(super) fn amount(asset: Option<[u8; 32]>, amount: i64) -> Amount {
    Amount {
        asset_id: asset.map(|a| a.to_vec()).unwrap_or_default(),
        amount,
    }
}

fn recipient(field: &'static str, tx: Fields<'_>) -> Result<Recipient> {
    let recipient = match tx.recipient(field)? {
        JsonRecipient::Address(address) => {
            recipient::Recipient::PublicKeyHash(address.as_bytes()[PUBLIC_KEY_HASH].to_vec())
        }
        JsonRecipient::Alias { name, .. } => recipient::Recipient::Alias(name),
    };
    Ok(Recipient {
        recipient: Some(recipient),
    })
}

fn script(tx: Fields<'_>) -> Result<Vec<u8>> {
    Ok(tx.opt_base64("script")?.unwrap_or_default())
}

fn data_entry(entry: Fields<'_>) -> Result<DataEntry> {
    use data_entry::Value;

    let value = match entry.opt_text("type")? {
        None => None,
        Some("integer") => Some(Value::IntValue(entry.int("value")?)),
        Some("boolean") => Some(Value::BoolValue(entry.bool("value")?)),
        Some("binary") => Some(Value::BinaryValue(decode_base64(
            "value",
            entry.text("value")?,
        )?)),
        Some("string") => Some(Value::StringValue(entry.text("value")?.to_string())),
        Some(other) => {
            return Err(TransactionError::invalid(
                "type",
                format!("unknown data type '{other}'"),
            ))
        }
    };
    Ok(DataEntry {
        key: entry.text("key")?.to_string(),
        value,
    })
}

fn data(kind: TransactionKind, scheme: u8, tx: Fields<'_>) -> Result<transaction::Data> {
    use transaction::Data;

    Ok(match kind {
        TransactionKind::Issue => Data::Issue(IssueData {
            name: tx.text("name")?.to_string(),
            description: tx.text("description")?.to_string(),
            amount: tx.int("quantity")?,
            decimals: tx.byte("decimals")?.into(),
            reissuable: tx.bool("reissuable")?,
            script: script(tx)?,
        }),
        TransactionKind::Transfer => Data::Transfer(TransferData {
            recipient: Some(recipient("recipient", tx)?),
            amount: Some(amount(tx.opt_asset("assetId")?, tx.int("amount")?)),
            attachment: tx.base58_or_empty("attachment")?,
        }),
        TransactionKind::Reissue => Data::Reissue(ReissueData {
            asset_amount: Some(amount(Some(tx.digest("assetId")?), tx.int("quantity")?)),
            reissuable: tx.bool("reissuable")?,
        }),
        TransactionKind::Burn => Data::Burn(BurnData {
            asset_amount: Some(amount(Some(tx.digest("assetId")?), tx.int("amount")?)),
        }),
        TransactionKind::Exchange => {
            let orders = [tx.object("order1")?, tx.object("order2")?]
                .into_iter()
                .map(|o| JsonOrder::parse(o)?.to_proto(scheme))
                .collect::<Result<Vec<_>>>()?;
            Data::Exchange(ExchangeData {
                amount: tx.int("amount")?,
                price: tx.int("price")?,
                buy_matcher_fee: tx.int("buyMatcherFee")?,
                sell_matcher_fee: tx.int("sellMatcherFee")?,
                orders,
            })
        }
        TransactionKind::Lease => Data::Lease(LeaseData {
            recipient: Some(recipient("recipient", tx)?),
            amount: tx.int("amount")?,
        }),
        TransactionKind::LeaseCancel => Data::LeaseCancel(LeaseCancelData {
            lease_id: tx.digest("leaseId")?.to_vec(),
        }),
        TransactionKind::CreateAlias => Data::CreateAlias(CreateAliasData {
            alias: tx.text("alias")?.to_string(),
        }),
        TransactionKind::MassTransfer => {
            let transfers = tx
                .array("transfers")?
                .iter()
                .map(|t| {
                    let t = Fields::of("transfers", t)?;
                    Ok(MassTransferEntry {
                        recipient: Some(recipient("recipient", t)?),
                        amount: t.int("amount")?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Data::MassTransfer(MassTransferData {
                asset_id: amount(tx.opt_asset("assetId")?, 0).asset_id,
                transfers,
                attachment: tx.base58_or_empty("attachment")?,
            })
        }
        TransactionKind::Data => Data::DataTransaction(DataData {
            data: tx
                .array("data")?
                .iter()
                .map(|e| data_entry(Fields::of("data", e)?))
                .collect::<Result<Vec<_>>>()?,
        }),
        TransactionKind::SetScript => Data::SetScript(SetScriptData {
            script: script(tx)?,
        }),
        TransactionKind::SponsorFee => Data::SponsorFee(SponsorFeeData {
            min_fee: Some(amount(
                Some(tx.digest("assetId")?),
                tx.opt_int("minSponsoredAssetFee")?.unwrap_or(0),
            )),
        }),
        TransactionKind::SetAssetScript => Data::SetAssetScript(SetAssetScriptData {
            asset_id: tx.digest("assetId")?.to_vec(),
            script: script(tx)?,
        }),
        TransactionKind::InvokeScript => Data::InvokeScript(InvokeScriptData {
            d_app: Some(recipient("dApp", tx)?),
            function_call: match tx.opt_object("call")? {
                Some(c) => call::serialize(c)?,
                None => Vec::new(),
            },
            payments: tx
                .array("payment")?
                .iter()
                .map(|p| {
                    let p = Fields::of("payment", p)?;
                    Ok(amount(p.opt_asset("assetId")?, p.int("amount")?))
                })
                .collect::<Result<Vec<_>>>()?,
        }),
        TransactionKind::UpdateAssetInfo => Data::UpdateAssetInfo(UpdateAssetInfoData {
            asset_id: tx.digest("assetId")?.to_vec(),
            name: tx.text("name")?.to_string(),
            description: tx.text("description")?.to_string(),
        }),
    })
}

/// Encoded unsigned `waves.Transaction` message.
pub(super) fn body_bytes(
    kind: TransactionKind,
    version: u8,
    scheme: u8,
    tx: Fields<'_>,
) -> Result<Vec<u8>> {
    let sender_public_key = tx.public_key("senderPublicKey")?;
    let fee = amount(tx.opt_asset("feeAssetId")?, tx.int("fee")?);
    let timestamp = tx.int("timestamp")?;

    let message = Transaction {
        chain_id: scheme.into(),
        sender_public_key,
        fee: Some(fee),
        timestamp,
        version: version.into(),
        data: Some(data(kind, scheme, tx)?),
    };
    Ok(message.encode_to_vec())
}
