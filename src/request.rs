//! Randomness requests and the hash that identifies them

use crate::config::VRF_VERSION;
use crate::crypto::hash::keccak256;
use crate::error::{Result, VrfError};
use crate::types::RequestId;
use crate::utils::{current_time_secs, hex_to_bytes};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// keccak256(be8(version) ‖ agent ‖ hex(seed) ‖ be8(timestamp) ‖ callback)
pub fn compute_request_id(
    version: u64,
    target_agent_id: &str,
    client_seed_hex: &str,
    timestamp_secs: u64,
    callback_uri: &str,
) -> Result<RequestId> {
    let seed = hex_to_bytes(client_seed_hex)?;

    let mut combined = Vec::with_capacity(
        16 + target_agent_id.len() + seed.len() + callback_uri.len(),
    );
    combined.extend_from_slice(&version.to_be_bytes());
    combined.extend_from_slice(target_agent_id.as_bytes());
    combined.extend_from_slice(&seed);
    combined.extend_from_slice(&timestamp_secs.to_be_bytes());
    combined.extend_from_slice(callback_uri.as_bytes());

    Ok(RequestId(keccak256(&combined)))
}

/// True for a hyphenated, version 4 UUID
pub fn check_uuid(uuid: &str) -> bool {
    if uuid.len() != 36 {
        return false;
    }
    match Uuid::parse_str(uuid) {
        Ok(parsed) => parsed.get_version_num() == 4,
        Err(_) => false,
    }
}

/// A request for a verifiable random number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VrfRequest {
    pub version: u64,
    pub target_agent_id: String,
    pub client_seed: String,
    pub key_hash: String,
    pub request_timestamp: u64,
    pub request_id: String,
    pub callback_uri: String,
}

impl VrfRequest {
    /// Build a request stamped with the current time and its computed id
    pub fn new(
        target_agent_id: impl Into<String>,
        client_seed: impl Into<String>,
        key_hash: impl Into<String>,
        callback_uri: impl Into<String>,
    ) -> Result<Self> {
        Self::with_timestamp(
            target_agent_id,
            client_seed,
            key_hash,
            callback_uri,
            current_time_secs(),
        )
    }

    pub fn with_timestamp(
        target_agent_id: impl Into<String>,
        client_seed: impl Into<String>,
        key_hash: impl Into<String>,
        callback_uri: impl Into<String>,
        request_timestamp: u64,
    ) -> Result<Self> {
        let mut request = Self {
            version: VRF_VERSION,
            target_agent_id: target_agent_id.into(),
            client_seed: client_seed.into(),
            key_hash: key_hash.into(),
            request_timestamp,
            request_id: String::new(),
            callback_uri: callback_uri.into(),
        };
        request.request_id = request.compute_id()?.to_hex();
        Ok(request)
    }

    /// Recompute the id from this request's fields
    pub fn compute_id(&self) -> Result<RequestId> {
        compute_request_id(
            self.version,
            &self.target_agent_id,
            &self.client_seed,
            self.request_timestamp,
            &self.callback_uri,
        )
    }

    /// Check version, agent id shape and that `request_id` matches the fields
    pub fn validate(&self, expected_version: u64) -> Result<()> {
        if self.version != expected_version {
            return Err(VrfError::validation(format!(
                "VRF version mismatch, must be {}",
                expected_version
            )));
        }
        if !check_uuid(&self.target_agent_id) {
            return Err(VrfError::validation(format!(
                "Invalid target agent id: {}",
                self.target_agent_id
            )));
        }
        let computed = self.compute_id()?;
        if !self
            .request_id
            .trim_start_matches("0x")
            .eq_ignore_ascii_case(&computed.to_hex())
        {
            return Err(VrfError::validation(format!(
                "Invalid request ID: {}",
                self.request_id
            )));
        }
        Ok(())
    }
}
