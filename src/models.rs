//! Provider API response models

use crate::error::{Result, SerializationError, VrfError};
use crate::proof::VrfProof;
use serde::{Deserialize, Serialize};

/// Envelope shared by every provider response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub message: Option<String>,
    pub code: i64,
    pub response_enum: Option<String>,
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(result: T) -> Self {
        Self {
            message: Some("success".to_string()),
            code: 0,
            response_enum: Some("SUCCESS".to_string()),
            result: Some(result),
        }
    }

    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            code,
            response_enum: None,
            result: None,
        }
    }

    /// The payload, or a provider error when `code` is non-zero
    pub fn into_result(self) -> Result<T> {
        if self.code != 0 {
            return Err(VrfError::Provider {
                code: self.code,
                message: self.message.unwrap_or_else(|| "Unknown error".to_string()),
            });
        }
        self.result.ok_or_else(|| {
            SerializationError::MissingField {
                field: "result".to_string(),
            }
            .into()
        })
    }
}

/// A randomness provider and the hash of its VRF key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub address: String,
    pub key_hash: String,
}

pub type ProviderResponse = ApiResponse<Vec<Provider>>;
pub type VrfProofResponse = ApiResponse<VrfProof>;
pub type VrfResponse = ApiResponse<String>;
