//! Client for requesting and verifying provider randomness

use crate::config::VrfConfig;
use crate::crypto::address::key_hash;
use crate::error::{Result, VrfError};
use crate::models::Provider;
use crate::proof::Proof;
use crate::provider::{HttpProvider, MemoryProvider, ProviderApi};
use crate::request::VrfRequest;
use crate::types::VrfOutput;
use crate::utils::strip_hex_prefix;
use crate::verifier::VrfVerifier;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

/// A provider proof that passed verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedProof {
    pub request_id: String,
    pub proof: Proof,
    pub output: VrfOutput,
}

/// Requests randomness from a provider and checks every proof it returns
pub struct VrfClient {
    api: Arc<dyn ProviderApi>,
    verifier: VrfVerifier,
    config: VrfConfig,
}

impl VrfClient {
    pub fn new(api: Arc<dyn ProviderApi>) -> Self {
        Self::with_config(api, VrfConfig::default())
    }

    pub fn with_config(api: Arc<dyn ProviderApi>, config: VrfConfig) -> Self {
        let verifier = VrfVerifier::with_config(config.verifier());
        Self {
            api,
            verifier,
            config,
        }
    }

    /// Client for the HTTP provider at `config.api_base_server`
    pub fn http(config: VrfConfig) -> Result<Self> {
        let api = Arc::new(HttpProvider::new(config.clone())?);
        Ok(Self::with_config(api, config))
    }

    pub fn builder() -> VrfClientBuilder {
        VrfClientBuilder::new()
    }

    pub fn config(&self) -> &VrfConfig {
        &self.config
    }

    pub fn verifier(&self) -> &VrfVerifier {
        &self.verifier
    }

    /// Build a request stamped now, with its id filled in
    pub fn build_request(
        &self,
        target_agent_id: &str,
        client_seed: &str,
        key_hash: &str,
        callback_uri: &str,
    ) -> Result<VrfRequest> {
        VrfRequest::new(target_agent_id, client_seed, key_hash, callback_uri)
    }

    pub async fn get_providers(&self) -> Result<Vec<Provider>> {
        let response = self.with_timeout(self.api.providers()).await?;
        response.into_result()
    }

    /// Validate and submit; returns the request id the provider accepted
    pub async fn request(&self, request: &VrfRequest) -> Result<String> {
        request.validate(self.config.vrf_version)?;
        let response = self.with_timeout(self.api.submit_request(request)).await?;
        let accepted = response.into_result()?;
        info!("provider accepted request {}", accepted);
        Ok(accepted)
    }

    /// Fetch the proof for `request_id` and verify it
    pub async fn query_proof(&self, request_id: &str) -> Result<VerifiedProof> {
        let response = self.with_timeout(self.api.query_proof(request_id)).await?;
        let record = response.into_result()?;

        if !same_hex(&record.request_id, request_id) {
            warn!(
                "provider returned proof for {} when asked for {}",
                record.request_id, request_id
            );
            return Err(VrfError::RequestIdMismatch {
                expected: request_id.to_string(),
                actual: record.request_id,
            });
        }

        let proof = record.convert()?;
        let output = match self.verifier.verify(&proof) {
            Ok(output) => output,
            Err(failure) => {
                warn!("proof for request {} rejected: {}", request_id, failure);
                return Err(failure.into());
            },
        };

        info!("verified proof for request {}, output {}", request_id, output);
        Ok(VerifiedProof {
            request_id: record.request_id,
            proof,
            output,
        })
    }

    /// Fetch and verify the proof for `request`, which must come from the key it named
    pub async fn query_proof_for(&self, request: &VrfRequest) -> Result<VerifiedProof> {
        let verified = self.query_proof(&request.request_id).await?;
        let actual = key_hash(&verified.proof.public_key);
        if !same_hex(&actual, &request.key_hash) {
            warn!(
                "proof for request {} signed by key {} instead of {}",
                request.request_id, actual, request.key_hash
            );
            return Err(VrfError::KeyHashMismatch {
                expected: request.key_hash.clone(),
                actual,
            });
        }
        Ok(verified)
    }

    /// Submit `request`, then fetch and verify its proof
    pub async fn request_randomness(&self, request: &VrfRequest) -> Result<VerifiedProof> {
        let accepted = self.request(request).await?;
        if !same_hex(&accepted, &request.request_id) {
            return Err(VrfError::RequestIdMismatch {
                expected: request.request_id.clone(),
                actual: accepted,
            });
        }
        self.query_proof_for(request).await
    }

    async fn with_timeout<T, F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let duration = self.config.timeout();
        match tokio::time::timeout(duration, call).await {
            Ok(result) => result,
            Err(_) => Err(VrfError::Timeout { duration }),
        }
    }
}

/// Compare hex identifiers ignoring `0x` and case
fn same_hex(a: &str, b: &str) -> bool {
    strip_hex_prefix(a).eq_ignore_ascii_case(strip_hex_prefix(b))
}

/// Builder for VRF clients
pub struct VrfClientBuilder {
    api: Option<Arc<dyn ProviderApi>>,
    config: VrfConfig,
}

impl VrfClientBuilder {
    pub fn new() -> Self {
        Self {
            api: None,
            config: VrfConfig::default(),
        }
    }

    /// Set the provider backend
    pub fn with_api(mut self, api: Arc<dyn ProviderApi>) -> Self {
        self.api = Some(api);
        self
    }

    pub fn with_config(mut self, config: VrfConfig) -> Self {
        self.config = config;
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.timeout_ms = timeout_ms;
        self
    }

    pub fn max_hash_iterations(mut self, max_hash_iterations: usize) -> Self {
        self.config.max_hash_iterations = max_hash_iterations;
        self
    }

    /// Build the client, falling back to an in-process provider
    pub fn build(self) -> Result<VrfClient> {
        self.config.validate()?;
        let api = self
            .api
            .unwrap_or_else(|| Arc::new(MemoryProvider::new()));
        Ok(VrfClient::with_config(api, self.config))
    }
}

impl Default for VrfClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_hex_ignores_prefix_and_case() {
        assert!(same_hex("0xABCD", "abcd"));
        assert!(!same_hex("abcd", "abce"));
    }

    #[test]
    fn test_builder_rejects_bad_config() {
        assert!(VrfClient::builder().max_hash_iterations(0).build().is_err());
        let client = VrfClient::builder().timeout_ms(1000).build().unwrap();
        assert_eq!(client.config().timeout_ms, 1000);
    }
}
