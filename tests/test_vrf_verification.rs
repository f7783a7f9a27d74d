use num_bigint::BigUint;
use proptest::prelude::*;
use vrf_oracle_rust::crypto::curve::{CurveParams, CurvePoint};
use vrf_oracle_rust::crypto::field;
use vrf_oracle_rust::{
    verify, EthAddress, Proof, ProofOrigin, Result, VerificationFailure, VrfSecretKey,
    VrfVerifier,
};

fn golden_origin() -> ProofOrigin {
    ProofOrigin {
        public_x: "0xed3bace23c5e17652e174c835fb72bf53ee306b3406a26890221b4cef7500f88".into(),
        public_y: "0xe57a6f571288ccffdcda5e8a7a1f87bf97bd17be084895d0fce17ad5e335286e".into(),
        gamma_x: "0x7ce22e7667f955f5dcc805a5bae7f78d21d0cb04eb5190f3b8e20b68a45d0b87".into(),
        gamma_y: "0x0c8f9d9e8d5e4eb22adf379df733a8b1ce4edf26a2ca9a4a3d8a07cb3e3dffd9".into(),
        c: "0x045945e1b7362a7026df893d39496eb838b6d85264f56899182269be4d53d6fe".into(),
        s: "0x07ebf871ad068ce4bbe04cd726e359334581881b4e78da352b7ac413ebcf90a2".into(),
        seed: "0xd3ea21873da2909f9f732966278cc022d523006ea574a58b324b83c0c08a5346".into(),
        output: "0x11449014f7e3fb46f190149f5c147242300ccdb0e77a58fa53e01972939a3f14".into(),
    }
}

fn golden_proof() -> Proof {
    Proof::from_origin(&golden_origin()).unwrap()
}

fn hex_int(s: &str) -> BigUint {
    BigUint::parse_bytes(s.as_bytes(), 16).unwrap()
}

#[test]
fn test_golden_proof_verifies() -> Result<()> {
    let proof = golden_proof();
    let output = verify(&proof)?;
    assert_eq!(
        output.to_hex(),
        "0x11449014f7e3fb46f190149f5c147242300ccdb0e77a58fa53e01972939a3f14"
    );
    assert!(VrfVerifier::new().verify_vrf_proof(&proof)?);
    Ok(())
}

#[test]
fn test_golden_intermediate_values() -> Result<()> {
    let verifier = VrfVerifier::new();
    let params = verifier.params();
    let proof = golden_proof();

    let h = verifier.hash_to_curve(&proof.public_key, &proof.seed)?;
    assert_eq!(
        h.x(),
        hex_int("a17b379025046078f508e4541a623ea16cd31b7617d8834fb0b0e42aa4729867")
    );
    assert_eq!(
        h.y(),
        hex_int("9360cf71bab12dc57b6180440749e0cee0f22c4e8657312d92acd7a2c6488160")
    );

    let u_prime =
        params.linear_combination(&proof.c, &proof.public_key, &proof.s, &params.generator)?;
    assert_eq!(
        EthAddress::from_point(&u_prime),
        EthAddress::from_hex("0x154c2937ddb55f6b7fdf351778727e5a3f87a0b8")?
    );

    assert_eq!(
        verifier.output_from_gamma(&proof.gamma).to_biguint(),
        proof.output
    );
    Ok(())
}

#[test]
fn test_prover_output_is_accepted() -> Result<()> {
    let verifier = VrfVerifier::new();
    for seed in [0u64, 1, 42, u64::MAX] {
        let key = VrfSecretKey::random();
        let proof = key.prove(verifier.params(), &BigUint::from(seed), 256)?;
        let output = verifier.verify(&proof)?;
        assert_eq!(output.to_biguint(), proof.output);
    }
    Ok(())
}

#[test]
fn test_scalars_at_group_order_are_malformed() {
    let params = CurveParams::secp256k1();

    let mut proof = golden_proof();
    proof.c = params.group_order.clone();
    assert!(matches!(
        verify(&proof),
        Err(VerificationFailure::MalformedProof { .. })
    ));

    let mut proof = golden_proof();
    proof.s = params.group_order.clone();
    assert!(matches!(
        verify(&proof),
        Err(VerificationFailure::MalformedProof { .. })
    ));
}

#[test]
fn test_oversized_output_and_seed_are_malformed() {
    let mut proof = golden_proof();
    proof.output = BigUint::from(1u32) << 256;
    assert!(matches!(
        verify(&proof),
        Err(VerificationFailure::MalformedProof { .. })
    ));

    let mut proof = golden_proof();
    proof.seed = BigUint::from(1u32) << 256;
    assert!(matches!(
        verify(&proof),
        Err(VerificationFailure::MalformedProof { .. })
    ));
}

#[test]
fn test_off_curve_gamma_is_malformed() {
    let mut origin = golden_origin();
    origin.gamma_y = "0x0c8f9d9e8d5e4eb22adf379df733a8b1ce4edf26a2ca9a4a3d8a07cb3e3dffda".into();
    assert!(matches!(
        Proof::from_origin(&origin),
        Err(VerificationFailure::MalformedProof { .. })
    ));
}

#[test]
fn test_degenerate_proof_rejected() -> Result<()> {
    let verifier = VrfVerifier::new();
    let golden = golden_proof();
    let h = verifier.hash_to_curve(&golden.public_key, &golden.seed)?;

    let one = BigUint::from(1u32);
    let proof = Proof::new(
        golden.public_key,
        h,
        one.clone(),
        one,
        golden.seed.clone(),
        BigUint::from(0u32),
    );
    assert_eq!(
        verifier.verify(&proof),
        Err(VerificationFailure::DegenerateProof)
    );
    assert_eq!(
        verifier.verify_vrf_proof(&proof),
        Err(VerificationFailure::DegenerateProof)
    );
    Ok(())
}

#[test]
fn test_single_bit_mutations_rejected() {
    let golden = golden_proof();
    let flip = |value: &BigUint, bit: u32| value.clone() ^ (BigUint::from(1u32) << bit);

    for bit in [0u32, 1, 7, 64, 128, 200, 255] {
        let mut proof = golden.clone();
        proof.c = flip(&golden.c, bit);
        assert!(verify(&proof).is_err(), "c bit {}", bit);

        let mut proof = golden.clone();
        proof.s = flip(&golden.s, bit);
        assert!(verify(&proof).is_err(), "s bit {}", bit);

        let mut proof = golden.clone();
        proof.output = flip(&golden.output, bit);
        assert!(verify(&proof).is_err(), "output bit {}", bit);

        let mut proof = golden.clone();
        proof.seed = flip(&golden.seed, bit);
        assert!(verify(&proof).is_err(), "seed bit {}", bit);
    }
}

#[test]
fn test_gamma_mutations_rejected() {
    let golden = golden_proof();
    for byte in [0usize, 13, 31] {
        let mut x = *golden.gamma.x_bytes();
        x[byte] ^= 1;
        // most mutations leave the curve; any that stay on it must still fail
        if let Ok(gamma) = CurvePoint::from_bytes(&x, golden.gamma.y_bytes()) {
            let mut proof = golden.clone();
            proof.gamma = gamma;
            assert!(verify(&proof).is_err());
        }
    }

    let mut proof = golden.clone();
    proof.gamma = golden.gamma.negate();
    assert!(verify(&proof).is_err());
}

#[test]
fn test_proof_from_other_key_rejected() -> Result<()> {
    let verifier = VrfVerifier::new();
    let seed = BigUint::from(7u32);
    let proof = VrfSecretKey::random().prove(verifier.params(), &seed, 256)?;
    let other = VrfSecretKey::random().public_key()?;

    let mut forged = proof.clone();
    forged.public_key = other;
    assert!(verifier.verify(&forged).is_err());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_hash_to_curve_is_deterministic(seed in any::<[u8; 32]>()) {
        let params = CurveParams::secp256k1();
        let seed = BigUint::from_bytes_be(&seed);
        let pk = CurvePoint::generator();

        let first = field::hash_to_curve(&params, &pk, &seed, 256).unwrap();
        let second = field::hash_to_curve(&params, &pk, &seed, 256).unwrap();
        prop_assert_eq!(first, second);
        prop_assert!(first.is_valid());
        prop_assert!(!first.has_odd_y());
    }
}
