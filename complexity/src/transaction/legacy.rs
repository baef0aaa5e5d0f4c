//! Legacy binary body layouts.
//!
//! Every integer is big-endian. Optional values are a `0` byte, or a `1`
//! byte followed by the value. Variable-length byte strings carry a `u16`
//! length prefix unless noted otherwise.
//!
//! ```text
//! transfer v1   [4]          pk asset? feeAsset? ts amount fee recipient attachment
//! transfer v2   [4, 2]       (same as v1)
//! data v1       [12, 1]      pk count entries... ts fee
//! invoke v1     [16, 1, ch]  pk dApp call? payments fee feeAsset? ts
//! ```

use serde_json::Value;

use super::call;
use super::fields::{Fields, Recipient};
use super::order::Order;
use super::{TransactionError, TransactionKind};

type Result<T> = std::result::Result<T, TransactionError>;

const DATA_INTEGER: u8 = 0;
const DATA_BOOLEAN: u8 = 1;
const DATA_BINARY: u8 = 2;
const DATA_STRING: u8 = 3;

/// Exchange v2 marks each version 1 order with this byte.
const ORDER_V1_MARK: u8 = 1;

/// Append-only writer for legacy body bytes.
#[derive(Default)]
pub(super) struct BodyWriter {
    buf: Vec<u8>,
}

impl BodyWriter {
    pub fn with_prefix(prefix: &[u8]) -> Self {
        let mut buf = Vec::with_capacity(256);
        buf.extend_from_slice(prefix);
        Self { buf }
    }

    pub fn put(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn put_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    pub fn put_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn put_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn put_u16_len(&mut self, field: &'static str, len: usize) -> Result<()> {
        let len = u16::try_from(len)
            .map_err(|_| TransactionError::invalid(field, "longer than 65535"))?;
        self.buf.extend_from_slice(&len.to_be_bytes());
        Ok(())
    }

    /// Length-prefixed bytes.
    pub fn put_sized(&mut self, field: &'static str, bytes: &[u8]) -> Result<()> {
        self.put_u16_len(field, bytes.len())?;
        self.put(bytes);
        Ok(())
    }

    /// Four-byte length, as used ahead of embedded orders.
    pub fn put_i32_len(&mut self, field: &'static str, len: usize) -> Result<()> {
        let len = i32::try_from(len).map_err(|_| TransactionError::invalid(field, "too long"))?;
        self.put_i32(len);
        Ok(())
    }

    pub fn put_option(&mut self, value: Option<&[u8]>) {
        match value {
            Some(bytes) => {
                self.put_u8(1);
                self.put(bytes);
            }
            None => self.put_u8(0),
        }
    }

    /// Optional length-prefixed bytes, used for scripts.
    pub fn put_sized_option(&mut self, field: &'static str, value: Option<&[u8]>) -> Result<()> {
        match value {
            Some(bytes) => {
                self.put_u8(1);
                self.put_sized(field, bytes)
            }
            None => {
                self.put_u8(0);
                Ok(())
            }
        }
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Body bytes of a pre-protobuf transaction version.
pub(super) fn body_bytes(
    kind: TransactionKind,
    version: u8,
    scheme: u8,
    tx: Fields<'_>,
) -> Result<Vec<u8>> {
    let unsupported = TransactionError::Unsupported {
        tx_type: kind.type_id(),
        version,
    };
    let v1 = version == 1;

    match kind {
        TransactionKind::Issue => {
            let mut w = prefixed(v1, &[3], &[3, 2, scheme]);
            w.put(&tx.public_key("senderPublicKey")?);
            w.put_sized("name", tx.text("name")?.as_bytes())?;
            w.put_sized("description", tx.text("description")?.as_bytes())?;
            w.put_i64(tx.int("quantity")?);
            w.put_u8(tx.byte("decimals")?);
            w.put_bool(tx.bool("reissuable")?);
            w.put_i64(tx.int("fee")?);
            w.put_i64(tx.int("timestamp")?);
            if !v1 {
                w.put_sized_option("script", tx.opt_base64("script")?.as_deref())?;
            }
            Ok(w.finish())
        }
        TransactionKind::Transfer => {
            let mut w = prefixed(v1, &[4], &[4, 2]);
            w.put(&tx.public_key("senderPublicKey")?);
            w.put_option(tx.opt_asset("assetId")?.as_ref().map(|a| a.as_slice()));
            w.put_option(tx.opt_asset("feeAssetId")?.as_ref().map(|a| a.as_slice()));
            w.put_i64(tx.int("timestamp")?);
            w.put_i64(tx.int("amount")?);
            w.put_i64(tx.int("fee")?);
            w.put(&tx.recipient("recipient")?.legacy_bytes("recipient")?);
            w.put_sized("attachment", &tx.base58_or_empty("attachment")?)?;
            Ok(w.finish())
        }
        TransactionKind::Reissue => {
            let mut w = prefixed(v1, &[5], &[5, 2, scheme]);
            w.put(&tx.public_key("senderPublicKey")?);
            w.put(&tx.digest("assetId")?);
            w.put_i64(tx.int("quantity")?);
            w.put_bool(tx.bool("reissuable")?);
            w.put_i64(tx.int("fee")?);
            w.put_i64(tx.int("timestamp")?);
            Ok(w.finish())
        }
        TransactionKind::Burn => {
            let mut w = prefixed(v1, &[6], &[6, 2, scheme]);
            w.put(&tx.public_key("senderPublicKey")?);
            w.put(&tx.digest("assetId")?);
            w.put_i64(tx.int("amount")?);
            w.put_i64(tx.int("fee")?);
            w.put_i64(tx.int("timestamp")?);
            Ok(w.finish())
        }
        TransactionKind::Exchange => exchange(v1, tx),
        TransactionKind::Lease => {
            let mut w = prefixed(v1, &[8], &[8, 2, 0]);
            w.put(&tx.public_key("senderPublicKey")?);
            w.put(&tx.recipient("recipient")?.legacy_bytes("recipient")?);
            w.put_i64(tx.int("amount")?);
            w.put_i64(tx.int("fee")?);
            w.put_i64(tx.int("timestamp")?);
            Ok(w.finish())
        }
        TransactionKind::LeaseCancel => {
            let mut w = prefixed(v1, &[9], &[9, 2, scheme]);
            w.put(&tx.public_key("senderPublicKey")?);
            w.put_i64(tx.int("fee")?);
            w.put_i64(tx.int("timestamp")?);
            w.put(&tx.digest("leaseId")?);
            Ok(w.finish())
        }
        TransactionKind::CreateAlias => {
            let mut w = prefixed(v1, &[10], &[10, 2]);
            w.put(&tx.public_key("senderPublicKey")?);
            let alias = Recipient::alias_bytes("alias", scheme, tx.text("alias")?)?;
            w.put_sized("alias", &alias)?;
            w.put_i64(tx.int("fee")?);
            w.put_i64(tx.int("timestamp")?);
            Ok(w.finish())
        }
        TransactionKind::MassTransfer if v1 => {
            let mut w = BodyWriter::with_prefix(&[11, 1]);
            w.put(&tx.public_key("senderPublicKey")?);
            w.put_option(tx.opt_asset("assetId")?.as_ref().map(|a| a.as_slice()));
            let transfers = tx.array("transfers")?;
            w.put_u16_len("transfers", transfers.len())?;
            for transfer in transfers {
                let transfer = Fields::of("transfers", transfer)?;
                w.put(&transfer.recipient("recipient")?.legacy_bytes("recipient")?);
                w.put_i64(transfer.int("amount")?);
            }
            w.put_i64(tx.int("timestamp")?);
            w.put_i64(tx.int("fee")?);
            w.put_sized("attachment", &tx.base58_or_empty("attachment")?)?;
            Ok(w.finish())
        }
        TransactionKind::Data if v1 => {
            let mut w = BodyWriter::with_prefix(&[12, 1]);
            w.put(&tx.public_key("senderPublicKey")?);
            let entries = tx.array("data")?;
            w.put_u16_len("data", entries.len())?;
            for entry in entries {
                data_entry(&mut w, entry)?;
            }
            w.put_i64(tx.int("timestamp")?);
            w.put_i64(tx.int("fee")?);
            Ok(w.finish())
        }
        TransactionKind::SetScript if v1 => {
            let mut w = BodyWriter::with_prefix(&[13, 1, scheme]);
            w.put(&tx.public_key("senderPublicKey")?);
            w.put_sized_option("script", tx.opt_base64("script")?.as_deref())?;
            w.put_i64(tx.int("fee")?);
            w.put_i64(tx.int("timestamp")?);
            Ok(w.finish())
        }
        TransactionKind::SponsorFee if v1 => {
            let mut w = BodyWriter::with_prefix(&[14, 1]);
            w.put(&tx.public_key("senderPublicKey")?);
            w.put(&tx.digest("assetId")?);
            w.put_i64(tx.opt_int("minSponsoredAssetFee")?.unwrap_or(0));
            w.put_i64(tx.int("fee")?);
            w.put_i64(tx.int("timestamp")?);
            Ok(w.finish())
        }
        TransactionKind::SetAssetScript if v1 => {
            let mut w = BodyWriter::with_prefix(&[15, 1, scheme]);
            w.put(&tx.public_key("senderPublicKey")?);
            w.put(&tx.digest("assetId")?);
            w.put_i64(tx.int("fee")?);
            w.put_i64(tx.int("timestamp")?);
            w.put_sized_option("script", tx.opt_base64("script")?.as_deref())?;
            Ok(w.finish())
        }
        TransactionKind::InvokeScript if v1 => {
            let mut w = BodyWriter::with_prefix(&[16, 1, scheme]);
            w.put(&tx.public_key("senderPublicKey")?);
            w.put(&tx.recipient("dApp")?.legacy_bytes("dApp")?);
            match tx.opt_object("call")? {
                Some(c) => {
                    w.put_u8(1);
                    w.put(&call::serialize(c)?);
                }
                None => w.put_u8(0),
            }
            let payments = tx.array("payment")?;
            w.put_u16_len("payment", payments.len())?;
            for payment in payments {
                let payment = Fields::of("payment", payment)?;
                let mut p = BodyWriter::default();
                p.put_i64(payment.int("amount")?);
                p.put_option(payment.opt_asset("assetId")?.as_ref().map(|a| a.as_slice()));
                w.put_sized("payment", &p.finish())?;
            }
            w.put_i64(tx.int("fee")?);
            w.put_option(tx.opt_asset("feeAssetId")?.as_ref().map(|a| a.as_slice()));
            w.put_i64(tx.int("timestamp")?);
            Ok(w.finish())
        }
        _ => Err(unsupported),
    }
}

fn prefixed(v1: bool, first: &[u8], second: &[u8]) -> BodyWriter {
    BodyWriter::with_prefix(if v1 { first } else { second })
}

fn data_entry(w: &mut BodyWriter, entry: &Value) -> Result<()> {
    let entry = Fields::of("data", entry)?;
    w.put_sized("key", entry.text("key")?.as_bytes())?;
    match entry.text("type")? {
        "integer" => {
            w.put_u8(DATA_INTEGER);
            w.put_i64(entry.int("value")?);
        }
        "boolean" => {
            w.put_u8(DATA_BOOLEAN);
            w.put_bool(entry.bool("value")?);
        }
        "binary" => {
            w.put_u8(DATA_BINARY);
            let bytes = entry
                .opt_base64("value")?
                .ok_or(TransactionError::MissingField("value"))?;
            w.put_sized("value", &bytes)?;
        }
        "string" => {
            w.put_u8(DATA_STRING);
            w.put_sized("value", entry.text("value")?.as_bytes())?;
        }
        other => return Err(TransactionError::invalid("type", format!("unknown data type '{other}'"))),
    }
    Ok(())
}

/// Exchange v1 and v2. Orders are embedded with their proofs.
fn exchange(v1: bool, tx: Fields<'_>) -> Result<Vec<u8>> {
    let order1 = Order::parse(tx.object("order1")?)?;
    let order2 = Order::parse(tx.object("order2")?)?;
    let bytes1 = order1.legacy_bytes()?;
    let bytes2 = order2.legacy_bytes()?;

    let mut w = if v1 {
        let mut w = BodyWriter::with_prefix(&[7]);
        w.put_i32_len("order1", bytes1.len())?;
        w.put_i32_len("order2", bytes2.len())?;
        w.put(&bytes1);
        w.put(&bytes2);
        w
    } else {
        let mut w = BodyWriter::with_prefix(&[0, 7, 2]);
        for (order, bytes) in [(&order1, &bytes1), (&order2, &bytes2)] {
            w.put_i32_len("order", bytes.len())?;
            if order.version() == 1 {
                w.put_u8(ORDER_V1_MARK);
            }
            w.put(bytes);
        }
        w
    };
    w.put_i64(tx.int("price")?);
    w.put_i64(tx.int("amount")?);
    w.put_i64(tx.int("buyMatcherFee")?);
    w.put_i64(tx.int("sellMatcherFee")?);
    w.put_i64(tx.int("fee")?);
    w.put_i64(tx.int("timestamp")?);
    Ok(w.finish())
}
