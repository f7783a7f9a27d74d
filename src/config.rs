//! Client and verifier configuration

use crate::crypto::field::DEFAULT_MAX_HASH_ITERATIONS;
use crate::error::{Result, VrfError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default provider endpoint
pub const DEFAULT_API_BASE_SERVER: &str = "http://10.0.54.95:8888";

/// Protocol version carried in every request
pub const VRF_VERSION: u64 = 1;

/// Default request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Verifier settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Cap on rehash rounds in field and curve hashing
    pub max_hash_iterations: usize,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            max_hash_iterations: DEFAULT_MAX_HASH_ITERATIONS,
        }
    }
}

/// Full configuration for a VRF client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VrfConfig {
    /// Base URL of the randomness provider API
    pub api_base_server: String,

    /// Required request version
    pub vrf_version: u64,

    /// Request timeout handed to the transport
    pub timeout_ms: u64,

    /// Cap on rehash rounds in field and curve hashing
    pub max_hash_iterations: usize,
}

impl Default for VrfConfig {
    fn default() -> Self {
        Self {
            api_base_server: DEFAULT_API_BASE_SERVER.to_string(),
            vrf_version: VRF_VERSION,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_hash_iterations: DEFAULT_MAX_HASH_ITERATIONS,
        }
    }
}

impl VrfConfig {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: VrfConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_hash_iterations == 0 {
            return Err(VrfError::config("max_hash_iterations must be positive"));
        }
        if self.vrf_version == 0 {
            return Err(VrfError::config("vrf_version must be positive"));
        }
        if self.api_base_server.trim().is_empty() {
            return Err(VrfError::config("api_base_server must not be empty"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn verifier(&self) -> VerifierConfig {
        VerifierConfig {
            max_hash_iterations: self.max_hash_iterations,
        }
    }

    /// Full URL for an API path such as `/api/vrf/query`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_server.trim_end_matches('/'), path)
    }
}
