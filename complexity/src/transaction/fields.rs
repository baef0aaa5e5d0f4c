//! Typed access to the fields of a transaction's JSON object.
//!
//! JSON `null` is treated the same as an absent field.

use base64::{engine::general_purpose, Engine};
use serde_json::{Map, Value};

use crate::block::Address;
use crate::config::DIGEST_LENGTH;

use super::TransactionError;

const PUBLIC_KEY_LENGTH: usize = 32;
const BASE64_PREFIX: &str = "base64:";
const ALIAS_PREFIX: &str = "alias:";
const ALIAS_VERSION: u8 = 2;
const WAVES_ASSET: &str = "WAVES";

type Result<T> = std::result::Result<T, TransactionError>;

#[derive(Clone, Copy)]
pub(crate) struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    /// Views a nested JSON value as an object.
    pub fn of(field: &'static str, value: &'a Value) -> Result<Self> {
        value
            .as_object()
            .map(Self::new)
            .ok_or_else(|| TransactionError::invalid(field, "expected an object"))
    }

    fn get(&self, name: &'static str) -> Option<&'a Value> {
        self.map.get(name).filter(|v| !v.is_null())
    }

    fn require(&self, name: &'static str) -> Result<&'a Value> {
        self.get(name).ok_or(TransactionError::MissingField(name))
    }

    pub fn has(&self, name: &'static str) -> bool {
        self.get(name).is_some()
    }

    pub fn opt_int(&self, name: &'static str) -> Result<Option<i64>> {
        self.get(name)
            .map(|v| {
                v.as_i64()
                    .ok_or_else(|| TransactionError::invalid(name, "expected a 64-bit integer"))
            })
            .transpose()
    }

    pub fn int(&self, name: &'static str) -> Result<i64> {
        self.opt_int(name)?.ok_or(TransactionError::MissingField(name))
    }

    pub fn opt_byte(&self, name: &'static str) -> Result<Option<u8>> {
        self.opt_int(name)?
            .map(|v| u8::try_from(v).map_err(|_| TransactionError::invalid(name, "out of range")))
            .transpose()
    }

    pub fn byte(&self, name: &'static str) -> Result<u8> {
        self.opt_byte(name)?.ok_or(TransactionError::MissingField(name))
    }

    pub fn bool(&self, name: &'static str) -> Result<bool> {
        self.require(name)?
            .as_bool()
            .ok_or_else(|| TransactionError::invalid(name, "expected a boolean"))
    }

    pub fn opt_text(&self, name: &'static str) -> Result<Option<&'a str>> {
        self.get(name)
            .map(|v| {
                v.as_str()
                    .ok_or_else(|| TransactionError::invalid(name, "expected a string"))
            })
            .transpose()
    }

    pub fn text(&self, name: &'static str) -> Result<&'a str> {
        self.opt_text(name)?.ok_or(TransactionError::MissingField(name))
    }

    pub fn opt_base58(&self, name: &'static str) -> Result<Option<Vec<u8>>> {
        self.opt_text(name)?
            .map(|s| {
                bs58::decode(s)
                    .into_vec()
                    .map_err(|e| TransactionError::invalid(name, e))
            })
            .transpose()
    }

    /// Base58 bytes where absence means empty, as for attachments.
    pub fn base58_or_empty(&self, name: &'static str) -> Result<Vec<u8>> {
        Ok(self.opt_base58(name)?.unwrap_or_default())
    }

    pub fn public_key(&self, name: &'static str) -> Result<Vec<u8>> {
        let bytes = self
            .opt_base58(name)?
            .ok_or(TransactionError::MissingField(name))?;
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(TransactionError::invalid(
                name,
                format!("expected {PUBLIC_KEY_LENGTH} bytes, got {}", bytes.len()),
            ));
        }
        Ok(bytes)
    }

    pub fn digest(&self, name: &'static str) -> Result<[u8; DIGEST_LENGTH]> {
        let bytes = self
            .opt_base58(name)?
            .ok_or(TransactionError::MissingField(name))?;
        let len = bytes.len();
        bytes.try_into().map_err(|_| {
            TransactionError::invalid(name, format!("expected {DIGEST_LENGTH} bytes, got {len}"))
        })
    }

    /// An asset id where absence or `"WAVES"` means the native token.
    pub fn opt_asset(&self, name: &'static str) -> Result<Option<[u8; DIGEST_LENGTH]>> {
        match self.opt_text(name)? {
            None | Some(WAVES_ASSET) => Ok(None),
            Some(_) => self.digest(name).map(Some),
        }
    }

    /// Bytes carried as `base64:...`, such as compiled scripts.
    pub fn opt_base64(&self, name: &'static str) -> Result<Option<Vec<u8>>> {
        self.opt_text(name)?
            .map(|s| decode_base64(name, s))
            .transpose()
    }

    pub fn recipient(&self, name: &'static str) -> Result<Recipient> {
        Recipient::parse(name, self.text(name)?)
    }

    pub fn object(&self, name: &'static str) -> Result<Fields<'a>> {
        Self::of(name, self.require(name)?)
    }

    pub fn opt_object(&self, name: &'static str) -> Result<Option<Fields<'a>>> {
        self.get(name).map(|v| Self::of(name, v)).transpose()
    }

    /// An array field where absence means empty.
    pub fn array(&self, name: &'static str) -> Result<&'a [Value]> {
        match self.get(name) {
            None => Ok(&[]),
            Some(v) => v
                .as_array()
                .map(Vec::as_slice)
                .ok_or_else(|| TransactionError::invalid(name, "expected an array")),
        }
    }
}

pub(crate) fn decode_base64(field: &'static str, s: &str) -> Result<Vec<u8>> {
    let encoded = s.strip_prefix(BASE64_PREFIX).unwrap_or(s);
    general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| TransactionError::invalid(field, e))
}

/// Recipient of a transfer, lease or invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Recipient {
    Address(Address),
    Alias { scheme: u8, name: String },
}

impl Recipient {
    /// Parses an address in base58 or an alias written as `alias:<scheme>:<name>`.
    pub fn parse(field: &'static str, s: &str) -> Result<Self> {
        if let Some(rest) = s.strip_prefix(ALIAS_PREFIX) {
            let (scheme, name) = rest
                .split_once(':')
                .ok_or_else(|| TransactionError::invalid(field, "malformed alias"))?;
            let scheme = match scheme.as_bytes() {
                [b] => *b,
                _ => return Err(TransactionError::invalid(field, "malformed alias scheme")),
            };
            return Ok(Self::Alias {
                scheme,
                name: name.to_string(),
            });
        }
        Address::from_base58(s)
            .map(Self::Address)
            .map_err(|e| TransactionError::invalid(field, e))
    }

    /// Alias bytes: version, scheme, then the length-prefixed name.
    pub fn alias_bytes(field: &'static str, scheme: u8, name: &str) -> Result<Vec<u8>> {
        let len = u16::try_from(name.len())
            .map_err(|_| TransactionError::invalid(field, "alias too long"))?;
        let mut out = Vec::with_capacity(4 + name.len());
        out.push(ALIAS_VERSION);
        out.push(scheme);
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(name.as_bytes());
        Ok(out)
    }

    pub fn legacy_bytes(&self, field: &'static str) -> Result<Vec<u8>> {
        match self {
            Self::Address(address) => Ok(address.as_bytes().to_vec()),
            Self::Alias { scheme, name } => Self::alias_bytes(field, *scheme, name),
        }
    }
}
