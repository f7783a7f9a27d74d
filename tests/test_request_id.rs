use vrf_oracle_rust::config::VRF_VERSION;
use vrf_oracle_rust::{compute_request_id, Result, VrfRequest};

const AGENT: &str = "f2464336-fbcf-4603-bda5-ce65c0318fb6";
const CALLBACK: &str = "http://127.0.0.1:8888/api/vrf/proof";
const GOLDEN_ID: &str = "6f71619f1e6ea42616c9bbdc8fe001511e0c37b72373dc259857b29c1e61597c";

#[test]
fn test_golden_request_id() -> Result<()> {
    let id = compute_request_id(1, AGENT, "0x1234", 1739265192, CALLBACK)?;
    assert_eq!(id.to_hex(), GOLDEN_ID);
    assert_eq!(id.to_string(), GOLDEN_ID);
    Ok(())
}

#[test]
fn test_every_field_changes_the_id() -> Result<()> {
    let base = compute_request_id(1, AGENT, "0x1234", 1739265192, CALLBACK)?;

    let variants = [
        compute_request_id(2, AGENT, "0x1234", 1739265192, CALLBACK)?,
        compute_request_id(
            1,
            "f2464336-fbcf-4603-bda5-ce65c0318fb7",
            "0x1234",
            1739265192,
            CALLBACK,
        )?,
        compute_request_id(1, AGENT, "0x1235", 1739265192, CALLBACK)?,
        compute_request_id(1, AGENT, "0x1234", 1739265193, CALLBACK)?,
        compute_request_id(1, AGENT, "0x1234", 1739265192, "http://127.0.0.1:8888/api/vrf")?,
    ];
    for variant in variants {
        assert_ne!(variant, base);
    }
    Ok(())
}

#[test]
fn test_request_round_trips_through_json() -> Result<()> {
    let request = VrfRequest::with_timestamp(AGENT, "0x1234", "0xabc", CALLBACK, 1739265192)?;
    assert_eq!(request.request_id, GOLDEN_ID);

    let json = serde_json::to_string(&request)?;
    let parsed: VrfRequest = serde_json::from_str(&json)?;
    assert_eq!(parsed, request);
    parsed.validate(VRF_VERSION)?;
    Ok(())
}

#[test]
fn test_prefixed_request_id_validates() -> Result<()> {
    let mut request = VrfRequest::with_timestamp(AGENT, "0x1234", "0xabc", CALLBACK, 1739265192)?;
    request.request_id = format!("0x{}", request.request_id.to_uppercase());
    request.validate(VRF_VERSION)?;
    Ok(())
}
