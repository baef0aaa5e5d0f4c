//! Exchange orders embedded in exchange transactions.

use super::fields::Fields;
use super::legacy::BodyWriter;
use super::proto::{self, order::PriceMode, order::Side};
use super::TransactionError;

type Result<T> = std::result::Result<T, TransactionError>;

const SIGNATURE_LENGTH: usize = 64;
const PROOFS_VERSION: u8 = 1;

/// First order version that exists only in protobuf form.
const FIRST_PROTOBUF_ORDER: u8 = 4;

pub(super) struct Order<'a> {
    fields: Fields<'a>,
    version: u8,
}

impl<'a> Order<'a> {
    pub fn parse(fields: Fields<'a>) -> Result<Self> {
        if fields.has("eip712Signature") {
            return Err(TransactionError::invalid(
                "eip712Signature",
                "orders signed with an Ethereum key are not supported",
            ));
        }
        let version = fields.opt_byte("version")?.unwrap_or(1);
        Ok(Self { fields, version })
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    fn side(&self) -> Result<Side> {
        match self.fields.text("orderType")? {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(TransactionError::invalid(
                "orderType",
                format!("unknown order side '{other}'"),
            )),
        }
    }

    fn price_mode(&self) -> Result<PriceMode> {
        match self.fields.opt_text("priceMode")? {
            None | Some("default") => Ok(PriceMode::Default),
            Some("fixedDecimals") => Ok(PriceMode::FixedDecimals),
            Some("assetDecimals") => Ok(PriceMode::AssetDecimals),
            Some(other) => Err(TransactionError::invalid(
                "priceMode",
                format!("unknown price mode '{other}'"),
            )),
        }
    }

    /// Proofs, falling back to the single signature of version 1 orders.
    fn proofs(&self) -> Result<Vec<Vec<u8>>> {
        let proofs = self.fields.array("proofs")?;
        if proofs.is_empty() {
            return Ok(self.fields.opt_base58("signature")?.into_iter().collect());
        }
        proofs
            .iter()
            .map(|p| {
                let s = p
                    .as_str()
                    .ok_or_else(|| TransactionError::invalid("proofs", "expected a string"))?;
                bs58::decode(s)
                    .into_vec()
                    .map_err(|e| TransactionError::invalid("proofs", e))
            })
            .collect()
    }

    /// Signed legacy bytes: the order body followed by its signature
    /// (version 1) or its proofs (versions 2 and 3).
    pub fn legacy_bytes(&self) -> Result<Vec<u8>> {
        if self.version >= FIRST_PROTOBUF_ORDER {
            return Err(TransactionError::invalid(
                "version",
                format!("order version {} needs a protobuf exchange", self.version),
            ));
        }
        let f = &self.fields;
        let pair = f.object("assetPair")?;

        let mut w = match self.version {
            1 => BodyWriter::default(),
            v => BodyWriter::with_prefix(&[v]),
        };
        w.put(&f.public_key("senderPublicKey")?);
        w.put(&f.public_key("matcherPublicKey")?);
        w.put_option(pair.opt_asset("amountAsset")?.as_ref().map(|a| a.as_slice()));
        w.put_option(pair.opt_asset("priceAsset")?.as_ref().map(|a| a.as_slice()));
        w.put_u8(self.side()? as u8);
        w.put_i64(f.int("price")?);
        w.put_i64(f.int("amount")?);
        w.put_i64(f.int("timestamp")?);
        w.put_i64(f.int("expiration")?);
        w.put_i64(f.int("matcherFee")?);
        if self.version == 3 {
            w.put_option(f.opt_asset("matcherFeeAssetId")?.as_ref().map(|a| a.as_slice()));
        }

        let proofs = self.proofs()?;
        if self.version == 1 {
            match proofs.as_slice() {
                [signature] if signature.len() == SIGNATURE_LENGTH => w.put(signature),
                _ => {
                    return Err(TransactionError::invalid(
                        "signature",
                        "version 1 orders carry one 64-byte signature",
                    ))
                }
            }
        } else {
            w.put_u8(PROOFS_VERSION);
            w.put_u16_len("proofs", proofs.len())?;
            for proof in &proofs {
                w.put_sized("proofs", proof)?;
            }
        }
        Ok(w.finish())
    }

    pub fn to_proto(&self, scheme: u8) -> Result<proto::Order> {
        let f = &self.fields;
        let pair = f.object("assetPair")?;
        let asset = |name: &'static str| -> Result<Vec<u8>> {
            Ok(pair.opt_asset(name)?.map(|a| a.to_vec()).unwrap_or_default())
        };

        Ok(proto::Order {
            chain_id: scheme.into(),
            sender_public_key: f.public_key("senderPublicKey")?,
            matcher_public_key: f.public_key("matcherPublicKey")?,
            asset_pair: Some(proto::AssetPair {
                amount_asset_id: asset("amountAsset")?,
                price_asset_id: asset("priceAsset")?,
            }),
            order_side: self.side()? as i32,
            amount: f.int("amount")?,
            price: f.int("price")?,
            timestamp: f.int("timestamp")?,
            expiration: f.int("expiration")?,
            matcher_fee: Some(proto::amount(
                f.opt_asset("matcherFeeAssetId")?,
                f.int("matcherFee")?,
            )),
            version: self.version.into(),
            proofs: self.proofs()?,
            price_mode: self.price_mode()? as i32,
            attachment: f.base58_or_empty("attachment")?,
        })
    }
}
