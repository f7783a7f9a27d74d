//! VRF proof verification
//!
//! Mirrors the on-chain verifier: a proof is accepted iff it is well formed,
//! `[c]·γ ≠ [s]·H`, and recomputing the challenge from `u' = [c]PK + [s]G`
//! and `v' = [c]γ + [s]H` reproduces both `c` and the claimed output.

use crate::config::VerifierConfig;
use crate::crypto::address::EthAddress;
use crate::crypto::challenge::scalar_from_curve_points;
use crate::crypto::curve::{CurveParams, CurvePoint};
use crate::crypto::field;
use crate::crypto::hash::keccak256_concat;
use crate::error::{CryptoError, VerificationFailure, VrfError};
use crate::proof::Proof;
use crate::types::VrfOutput;
use num_bigint::BigUint;
use std::sync::Arc;
use tracing::{debug, warn};

/// Stateless verifier; cheap to clone and safe to share across threads.
#[derive(Debug, Clone)]
pub struct VrfVerifier {
    params: Arc<CurveParams>,
    config: VerifierConfig,
}

impl VrfVerifier {
    pub fn new() -> Self {
        Self::with_config(VerifierConfig::default())
    }

    pub fn with_config(config: VerifierConfig) -> Self {
        Self::with_params(Arc::new(CurveParams::secp256k1()), config)
    }

    pub fn with_params(params: Arc<CurveParams>, config: VerifierConfig) -> Self {
        Self { params, config }
    }

    pub fn params(&self) -> &CurveParams {
        &self.params
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Hash `(p, seed)` onto the curve with this verifier's iteration cap
    pub fn hash_to_curve(&self, p: &CurvePoint, seed: &BigUint) -> crate::Result<CurvePoint> {
        field::hash_to_curve(&self.params, p, seed, self.config.max_hash_iterations)
    }

    /// false iff `[c]·gamma = [s]·hash`, which the solidity verifier disallows
    pub fn check_c_gamma_not_equal_to_s_hash(
        &self,
        c: &BigUint,
        gamma: &CurvePoint,
        s: &BigUint,
        hash: &CurvePoint,
    ) -> bool {
        self.params.multiply(c, gamma) != self.params.multiply(s, hash)
    }

    /// keccak256(outputPrefix ‖ gamma)
    pub fn output_from_gamma(&self, gamma: &CurvePoint) -> VrfOutput {
        VrfOutput(keccak256_concat(&[
            &self.params.output_prefix[..],
            &gamma.to_bytes()[..],
        ]))
    }

    /// Verify `proof`, returning the verified output on acceptance.
    pub fn verify(&self, proof: &Proof) -> Result<VrfOutput, VerificationFailure> {
        let params = &*self.params;

        if let Err(failure) = proof.well_formed(params) {
            warn!("rejecting malformed VRF proof: {}", failure);
            return Err(failure);
        }

        let h = self
            .hash_to_curve(&proof.public_key, &proof.seed)
            .map_err(hash_failure)?;
        debug!("hash to curve: {}", h);

        if !self.check_c_gamma_not_equal_to_s_hash(&proof.c, &proof.gamma, &proof.s, &h) {
            warn!("rejecting degenerate VRF proof for seed {:x}", proof.seed);
            return Err(VerificationFailure::DegenerateProof);
        }

        let u_prime = params
            .linear_combination(&proof.c, &proof.public_key, &proof.s, &params.generator)
            .map_err(|e| VerificationFailure::invalid(format!("u' = c·PK + s·G: {}", e)))?;
        let v_prime = params
            .linear_combination(&proof.c, &proof.gamma, &proof.s, &h)
            .map_err(|e| VerificationFailure::invalid(format!("v' = c·γ + s·H: {}", e)))?;

        let u_witness = EthAddress::from_point(&u_prime);
        let c_prime = scalar_from_curve_points(
            params,
            &h,
            &proof.public_key,
            &proof.gamma,
            &u_witness,
            &v_prime,
        ) % &params.group_order;
        let output = self.output_from_gamma(&proof.gamma);
        debug!("u witness {}, c' {:x}, output {}", u_witness, c_prime, output);

        if c_prime != proof.c {
            warn!("VRF challenge mismatch for seed {:x}", proof.seed);
            return Err(VerificationFailure::invalid("challenge does not match"));
        }
        if output.to_biguint() != proof.output {
            warn!("VRF output mismatch for seed {:x}", proof.seed);
            return Err(VerificationFailure::invalid("output does not match"));
        }

        debug!("VRF proof verified, output {}", output);
        Ok(output)
    }

    /// Boolean form: `Ok(false)` for a proof whose equations do not hold,
    /// `Err` for malformed or degenerate proofs.
    pub fn verify_vrf_proof(&self, proof: &Proof) -> Result<bool, VerificationFailure> {
        match self.verify(proof) {
            Ok(_) => Ok(true),
            Err(VerificationFailure::InvalidProof { .. }) => Ok(false),
            Err(other) => Err(other),
        }
    }
}

impl Default for VrfVerifier {
    fn default() -> Self {
        Self::new()
    }
}

fn hash_failure(err: VrfError) -> VerificationFailure {
    match err {
        VrfError::Crypto(CryptoError::InvalidInput { reason }) => {
            VerificationFailure::MalformedProof { reason }
        },
        other => VerificationFailure::Internal {
            reason: other.to_string(),
        },
    }
}

/// Verify with default curve parameters and iteration cap
pub fn verify(proof: &Proof) -> Result<VrfOutput, VerificationFailure> {
    VrfVerifier::new().verify(proof)
}
