use async_trait::async_trait;
use num_bigint::BigUint;
use std::sync::Arc;
use std::time::Duration;
use vrf_oracle_rust::crypto::key_hash;
use vrf_oracle_rust::models::{ProviderResponse, VrfProofResponse, VrfResponse};
use vrf_oracle_rust::{
    MemoryProvider, ProviderApi, Result, VerificationFailure, VrfClient, VrfError, VrfProof,
    VrfRequest, VrfSecretKey,
};

const AGENT: &str = "f2464336-fbcf-4603-bda5-ce65c0318fb6";
const CALLBACK: &str = "http://127.0.0.1:8888/api/vrf/proof";

fn setup() -> (Arc<MemoryProvider>, VrfClient) {
    let provider = Arc::new(MemoryProvider::new());
    let client = VrfClient::new(provider.clone());
    (provider, client)
}

#[tokio::test]
async fn test_request_and_verify() -> Result<()> {
    let (provider, client) = setup();

    let providers = client.get_providers().await?;
    assert_eq!(providers.len(), 1);

    let request = client.build_request(AGENT, "0x1234", &providers[0].key_hash, CALLBACK)?;
    let verified = client.request_randomness(&request).await?;

    assert_eq!(verified.request_id, request.request_id);
    assert_eq!(verified.output.to_biguint(), verified.proof.output);
    assert_eq!(provider.request_count().await, 1);
    Ok(())
}

#[tokio::test]
async fn test_proof_from_other_key_rejected() -> Result<()> {
    let (provider, client) = setup();
    let other_key = key_hash(&VrfSecretKey::random().public_key()?);

    let request = client.build_request(AGENT, "0x1234", &other_key, CALLBACK)?;
    match client.request_randomness(&request).await {
        Err(VrfError::KeyHashMismatch { expected, actual }) => {
            assert_eq!(expected, other_key);
            assert_eq!(actual, provider.descriptor()?.key_hash);
        },
        other => panic!("unexpected {:?}", other),
    }

    // the proof itself is sound, only its key differs from the requested one
    assert!(client.query_proof(&request.request_id).await.is_ok());

    let own_key = provider.descriptor()?.key_hash.to_uppercase().replacen("0X", "", 1);
    let request = client.build_request(AGENT, "0x5678", &own_key, CALLBACK)?;
    assert!(client.query_proof_for(&request).await.is_err());
    client.request(&request).await?;
    assert!(client.query_proof_for(&request).await.is_ok());
    Ok(())
}

#[tokio::test]
async fn test_invalid_request_not_submitted() -> Result<()> {
    let (provider, client) = setup();

    let mut request = VrfRequest::new(AGENT, "0x1234", "0xabc", CALLBACK)?;
    request.callback_uri = "http://elsewhere".to_string();

    assert!(matches!(
        client.request(&request).await,
        Err(VrfError::Validation(_))
    ));
    assert_eq!(provider.request_count().await, 0);
    Ok(())
}

#[tokio::test]
async fn test_provider_error_code_surfaces() -> Result<()> {
    let (provider, client) = setup();
    provider.fail_with(503, "provider offline").await;

    match client.get_providers().await {
        Err(VrfError::Provider { code, message }) => {
            assert_eq!(code, 503);
            assert_eq!(message, "provider offline");
        },
        other => panic!("unexpected {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_unknown_request_is_provider_error() -> Result<()> {
    let (_provider, client) = setup();
    assert!(matches!(
        client.query_proof("0xdeadbeef").await,
        Err(VrfError::Provider { code: 404, .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_proof_for_other_request_rejected() -> Result<()> {
    let (provider, client) = setup();
    let request = VrfRequest::new(AGENT, "0x1234", "0xabc", CALLBACK)?;
    client.request(&request).await?;

    let mut record = provider
        .query_proof(&request.request_id)
        .await?
        .into_result()?;
    record.request_id = "0xfeed".to_string();

    // provider echoes a request id other than the one asked for
    let mut response = VrfProofResponse::success(record);
    let api = Arc::new(FixedProvider {
        proof: response.clone(),
    });
    let client = VrfClient::new(api);

    assert!(matches!(
        client.query_proof(&request.request_id).await,
        Err(VrfError::RequestIdMismatch { .. })
    ));

    response.result = None;
    let client = VrfClient::new(Arc::new(FixedProvider { proof: response }));
    assert!(client.query_proof(&request.request_id).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_tampered_proof_rejected() -> Result<()> {
    let (provider, client) = setup();
    let request = VrfRequest::new(AGENT, "0x1234", "0xabc", CALLBACK)?;
    client.request(&request).await?;

    let record = provider
        .query_proof(&request.request_id)
        .await?
        .into_result()?;
    let mut proof = record.convert()?;
    proof.output += BigUint::from(1u32);
    provider
        .insert_proof(VrfProof {
            request_id: record.request_id.clone(),
            proof: proof.to_origin(),
        })
        .await;

    assert!(matches!(
        client.query_proof(&request.request_id).await,
        Err(VrfError::Verification(VerificationFailure::InvalidProof { .. }))
    ));
    Ok(())
}

#[tokio::test]
async fn test_slow_provider_times_out() -> Result<()> {
    let client = VrfClient::builder()
        .with_api(Arc::new(SlowProvider))
        .timeout_ms(20)
        .build()?;

    assert!(matches!(
        client.get_providers().await,
        Err(VrfError::Timeout { .. })
    ));
    Ok(())
}

struct FixedProvider {
    proof: VrfProofResponse,
}

#[async_trait]
impl ProviderApi for FixedProvider {
    async fn providers(&self) -> Result<ProviderResponse> {
        Ok(ProviderResponse::success(Vec::new()))
    }

    async fn submit_request(&self, request: &VrfRequest) -> Result<VrfResponse> {
        Ok(VrfResponse::success(request.request_id.clone()))
    }

    async fn query_proof(&self, _request_id: &str) -> Result<VrfProofResponse> {
        Ok(self.proof.clone())
    }
}

struct SlowProvider;

#[async_trait]
impl ProviderApi for SlowProvider {
    async fn providers(&self) -> Result<ProviderResponse> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(ProviderResponse::success(Vec::new()))
    }

    async fn submit_request(&self, request: &VrfRequest) -> Result<VrfResponse> {
        Ok(VrfResponse::success(request.request_id.clone()))
    }

    async fn query_proof(&self, request_id: &str) -> Result<VrfProofResponse> {
        Ok(VrfProofResponse::failure(404, format!("no proof for {}", request_id)))
    }
}
