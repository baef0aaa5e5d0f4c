//! Serialized dApp function calls carried by invoke-script transactions.
//!
//! ```text
//! call   = 0x09 0x01 name:len32 argc:i32 arg*
//! arg    = 0x00 i64           integer
//!        | 0x01 bytes:len32   binary
//!        | 0x02 utf8:len32    string
//!        | 0x06 | 0x07        true | false
//!        | 0x0b count:i32 arg*  list
//! ```

use serde_json::Value;

use super::fields::{decode_base64, Fields};
use super::TransactionError;

type Result<T> = std::result::Result<T, TransactionError>;

const E_LONG: u8 = 0;
const E_BYTES: u8 = 1;
const E_STRING: u8 = 2;
const E_TRUE: u8 = 6;
const E_FALSE: u8 = 7;
const E_FUNCALL: u8 = 9;
const E_ARR: u8 = 11;
const FH_USER: u8 = 1;

fn put_len(out: &mut Vec<u8>, len: usize) -> Result<()> {
    let len = i32::try_from(len).map_err(|_| TransactionError::invalid("call", "too long"))?;
    out.extend_from_slice(&len.to_be_bytes());
    Ok(())
}

fn put_sized(out: &mut Vec<u8>, bytes: &[u8]) -> Result<()> {
    put_len(out, bytes.len())?;
    out.extend_from_slice(bytes);
    Ok(())
}

fn argument(out: &mut Vec<u8>, arg: &Value) -> Result<()> {
    let arg = Fields::of("args", arg)?;
    match arg.text("type")? {
        "integer" => {
            out.push(E_LONG);
            out.extend_from_slice(&arg.int("value")?.to_be_bytes());
        }
        "binary" => {
            out.push(E_BYTES);
            put_sized(out, &decode_base64("value", arg.text("value")?)?)?;
        }
        "string" => {
            out.push(E_STRING);
            put_sized(out, arg.text("value")?.as_bytes())?;
        }
        "boolean" => out.push(if arg.bool("value")? { E_TRUE } else { E_FALSE }),
        "list" => {
            let items = arg.array("value")?;
            out.push(E_ARR);
            put_len(out, items.len())?;
            for item in items {
                argument(out, item)?;
            }
        }
        other => {
            return Err(TransactionError::invalid(
                "args",
                format!("unknown argument type '{other}'"),
            ))
        }
    }
    Ok(())
}

/// Serializes the `call` object of an invocation.
pub(super) fn serialize(call: Fields<'_>) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(64);
    out.push(E_FUNCALL);
    out.push(FH_USER);
    put_sized(&mut out, call.text("function")?.as_bytes())?;

    let args = call.array("args")?;
    put_len(&mut out, args.len())?;
    for arg in args {
        argument(&mut out, arg)?;
    }
    Ok(out)
}
