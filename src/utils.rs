//! Utility functions and helpers

use crate::error::{Result, SerializationError, VrfError};
use num_bigint::BigUint;

/// Current unix time in seconds
pub fn current_time_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// Drop a leading `0x`, if any
pub fn strip_hex_prefix(hex_str: &str) -> &str {
    hex_str.strip_prefix("0x").unwrap_or(hex_str)
}

/// Decode a hex string with optional `0x` prefix
pub fn hex_to_bytes(hex_str: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(strip_hex_prefix(hex_str))?)
}

/// Parse a big-endian hex integer such as `0x0c8f…`; odd digit counts are accepted.
///
/// Only ASCII hex digits are allowed after the prefix, so `_` separators and
/// signs are rejected.
pub fn parse_hex_biguint(field: &str, hex_str: &str) -> Result<BigUint> {
    let digits = strip_hex_prefix(hex_str);
    if digits.is_empty() {
        return Err(SerializationError::MissingField {
            field: field.to_string(),
        }
        .into());
    }
    let invalid = || -> VrfError {
        SerializationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("not a hex integer: {}", hex_str),
        }
        .into()
    };
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    BigUint::parse_bytes(digits.as_bytes(), 16).ok_or_else(invalid)
}

/// `0x`-prefixed lowercase hex of an integer
pub fn biguint_to_hex(value: &BigUint) -> String {
    format!("0x{}", value.to_str_radix(16))
}
