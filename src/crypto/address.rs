//! Ethereum-style addresses derived from curve points

use crate::crypto::{curve::CurvePoint, hash::keccak256};
use crate::error::{SerializationError, VrfError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Number of bytes in an address
pub const ADDRESS_LENGTH: usize = 20;

/// Hash identifying a provider key: `keccak256(x ‖ y)` as `0x` hex
pub fn key_hash(public_key: &CurvePoint) -> String {
    format!("0x{}", hex::encode(keccak256(&public_key.to_bytes())))
}

/// Last 160 bits of keccak256 of a serialized point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EthAddress([u8; ADDRESS_LENGTH]);

impl EthAddress {
    /// Derive the address of a point, `keccak256(x ‖ y)[12..]`
    pub fn from_point(point: &CurvePoint) -> Self {
        let hash = keccak256(&point.to_bytes());
        let mut address = [0u8; ADDRESS_LENGTH];
        address.copy_from_slice(&hash[32 - ADDRESS_LENGTH..]);
        Self(address)
    }

    pub fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parse a `0x`-prefixed, 40 hex digit address
    pub fn from_hex(hex_str: &str) -> Result<Self, VrfError> {
        let digits = hex_str.strip_prefix("0x").ok_or_else(|| {
            SerializationError::InvalidFormat {
                field: "address".to_string(),
                reason: "missing 0x prefix".to_string(),
            }
        })?;
        let bytes = hex::decode(digits)?;
        let address: [u8; ADDRESS_LENGTH] =
            bytes.try_into().map_err(|_| SerializationError::InvalidFormat {
                field: "address".to_string(),
                reason: format!("expected {} bytes", ADDRESS_LENGTH),
            })?;
        Ok(Self(address))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for EthAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EthAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<EthAddress, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EthAddress::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
