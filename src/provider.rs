//! Randomness provider API: an HTTP client for a remote provider and an
//! in-process implementation

use crate::config::{VrfConfig, VRF_VERSION};
use crate::crypto::address::{key_hash, EthAddress};
use crate::crypto::curve::CurveParams;
use crate::crypto::field::DEFAULT_MAX_HASH_ITERATIONS;
use crate::crypto::hash::keccak256_concat;
use crate::crypto::prover::VrfSecretKey;
use crate::error::{Result, VrfError};
use crate::models::{ApiResponse, Provider, ProviderResponse, VrfProofResponse, VrfResponse};
use crate::proof::VrfProof;
use crate::request::VrfRequest;
use crate::utils::{hex_to_bytes, strip_hex_prefix};
use async_trait::async_trait;
use num_bigint::BigUint;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub const CODE_BAD_REQUEST: i64 = 400;
pub const CODE_NOT_FOUND: i64 = 404;

pub const PROVIDER_PATH: &str = "/api/vrf/provider";
pub const REQUEST_PATH: &str = "/api/vrf/request";
pub const QUERY_PATH: &str = "/api/vrf/query";

/// Calls exposed by a randomness provider
#[async_trait]
pub trait ProviderApi: Send + Sync {
    async fn providers(&self) -> Result<ProviderResponse>;
    async fn submit_request(&self, request: &VrfRequest) -> Result<VrfResponse>;
    async fn query_proof(&self, request_id: &str) -> Result<VrfProofResponse>;
}

/// Provider reached over HTTP at `api_base_server`
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: Client,
    config: VrfConfig,
}

impl HttpProvider {
    pub fn new(config: VrfConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms.max(1)))
            .build()
            .map_err(|e| VrfError::config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.api_base_server
    }

    /// Request to `path` under the base server, tagged as JSON
    fn call(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.endpoint(path);
        debug!("{} {}", method, url);
        self.client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
    }

    /// Send `request` and decode the response envelope
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<ApiResponse<T>> {
        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        if !status.is_success() {
            warn!("provider returned HTTP {}: {}", status, body.trim());
            return Err(VrfError::HttpStatus {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn transport_error(&self, err: reqwest::Error) -> VrfError {
        if err.is_timeout() {
            VrfError::Timeout {
                duration: self.config.timeout(),
            }
        } else {
            VrfError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl ProviderApi for HttpProvider {
    async fn providers(&self) -> Result<ProviderResponse> {
        self.fetch(self.call(Method::GET, PROVIDER_PATH)).await
    }

    async fn submit_request(&self, request: &VrfRequest) -> Result<VrfResponse> {
        debug!("submitting request {}", request.request_id);
        self.fetch(self.call(Method::POST, REQUEST_PATH).json(request))
            .await
    }

    async fn query_proof(&self, request_id: &str) -> Result<VrfProofResponse> {
        debug!("querying proof for request {}", request_id);
        self.fetch(self.call(Method::GET, QUERY_PATH).query(&[("request_id", request_id)]))
            .await
    }
}

/// Provider that proves requests in-process with its own key
#[derive(Debug)]
pub struct MemoryProvider {
    key: VrfSecretKey,
    params: Arc<CurveParams>,
    max_hash_iterations: usize,
    requests: RwLock<HashMap<String, VrfRequest>>,
    proofs: RwLock<HashMap<String, VrfProof>>,
    failure: RwLock<Option<(i64, String)>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::with_key(VrfSecretKey::random())
    }

    pub fn with_key(key: VrfSecretKey) -> Self {
        Self {
            key,
            params: Arc::new(CurveParams::secp256k1()),
            max_hash_iterations: DEFAULT_MAX_HASH_ITERATIONS,
            requests: RwLock::new(HashMap::new()),
            proofs: RwLock::new(HashMap::new()),
            failure: RwLock::new(None),
        }
    }

    /// Provider record for this key: its address and `keccak256(x ‖ y)`
    pub fn descriptor(&self) -> Result<Provider> {
        let public_key = self.key.public_key()?;
        Ok(Provider {
            address: EthAddress::from_point(&public_key).to_string(),
            key_hash: key_hash(&public_key),
        })
    }

    /// Store a proof record as-is, replacing any proof for the same id
    pub async fn insert_proof(&self, proof: VrfProof) {
        let mut proofs = self.proofs.write().await;
        proofs.insert(normalize_id(&proof.request_id), proof);
    }

    /// Answer every subsequent call with this error code
    pub async fn fail_with(&self, code: i64, message: impl Into<String>) {
        *self.failure.write().await = Some((code, message.into()));
    }

    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    async fn failure<T>(&self) -> Option<ApiResponse<T>> {
        self.failure
            .read()
            .await
            .as_ref()
            .map(|(code, message)| ApiResponse::failure(*code, message.clone()))
    }

    /// Seed for a request: keccak256(request id ‖ client seed)
    fn proof_seed(request: &VrfRequest) -> Result<BigUint> {
        let id = hex_to_bytes(&request.request_id)?;
        let client_seed = hex_to_bytes(&request.client_seed)?;
        Ok(BigUint::from_bytes_be(&keccak256_concat(&[id.as_slice(), client_seed.as_slice()])))
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderApi for MemoryProvider {
    async fn providers(&self) -> Result<ProviderResponse> {
        if let Some(failure) = self.failure().await {
            return Ok(failure);
        }
        Ok(ApiResponse::success(vec![self.descriptor()?]))
    }

    async fn submit_request(&self, request: &VrfRequest) -> Result<VrfResponse> {
        if let Some(failure) = self.failure().await {
            return Ok(failure);
        }
        if let Err(e) = request.validate(VRF_VERSION) {
            return Ok(ApiResponse::failure(CODE_BAD_REQUEST, e.to_string()));
        }

        let seed = Self::proof_seed(request)?;
        let proof = self.key.prove(&self.params, &seed, self.max_hash_iterations)?;
        let id = normalize_id(&request.request_id);
        debug!("proved request {} with seed {:x}", id, seed);

        self.requests.write().await.insert(id.clone(), request.clone());
        self.proofs.write().await.insert(
            id.clone(),
            VrfProof {
                request_id: id.clone(),
                proof: proof.to_origin(),
            },
        );
        info!("accepted VRF request {}", id);
        Ok(ApiResponse::success(id))
    }

    async fn query_proof(&self, request_id: &str) -> Result<VrfProofResponse> {
        if let Some(failure) = self.failure().await {
            return Ok(failure);
        }
        let proofs = self.proofs.read().await;
        match proofs.get(&normalize_id(request_id)) {
            Some(proof) => Ok(ApiResponse::success(proof.clone())),
            None => Ok(ApiResponse::failure(
                CODE_NOT_FOUND,
                format!("no proof for request {}", request_id),
            )),
        }
    }
}

fn normalize_id(request_id: &str) -> String {
    strip_hex_prefix(request_id).to_ascii_lowercase()
}
