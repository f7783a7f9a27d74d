//! VRF proof generation
//!
//! Produces proofs that the verifier accepts: `gamma = x·H`, `u = k·G`,
//! `v = k·H`, `c = challenge(H, PK, gamma, addr(u), v) mod n`, `s = k - c·x`.

use crate::crypto::address::EthAddress;
use crate::crypto::challenge::scalar_from_curve_points;
use crate::crypto::curve::{CurveParams, CurvePoint};
use crate::crypto::field::hash_to_curve;
use crate::crypto::hash::keccak256_concat;
use crate::error::{CryptoError, Result};
use crate::proof::Proof;
use k256::elliptic_curve::{Field, PrimeField};
use k256::{ProjectivePoint, Scalar, SecretKey};
use num_bigint::BigUint;
use rand::rngs::OsRng;
use std::fmt;

/// A VRF private key
#[derive(Clone)]
pub struct VrfSecretKey {
    secret: SecretKey,
}

impl VrfSecretKey {
    /// Generate a fresh key from the OS RNG
    pub fn random() -> Self {
        Self {
            secret: SecretKey::random(&mut OsRng),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let secret = SecretKey::from_slice(bytes).map_err(|_| CryptoError::InvalidPrivateKey {
            reason: "not a valid secp256k1 scalar".to_string(),
        })?;
        Ok(Self { secret })
    }

    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = crate::utils::hex_to_bytes(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Convert to hex string (be careful with this!)
    pub fn to_hex(&self) -> String {
        hex::encode(self.secret.to_bytes())
    }

    pub fn public_key(&self) -> Result<CurvePoint> {
        CurvePoint::from_projective(self.secret.public_key().to_projective())
    }

    fn scalar(&self) -> Scalar {
        *self.secret.to_nonzero_scalar()
    }

    /// Prove `seed` with a random nonce
    pub fn prove(
        &self,
        params: &CurveParams,
        seed: &BigUint,
        max_iterations: usize,
    ) -> Result<Proof> {
        let nonce = SecretKey::random(&mut OsRng);
        self.prove_with_scalar_nonce(params, seed, *nonce.to_nonzero_scalar(), max_iterations)
    }

    /// Prove `seed` with a caller-chosen nonce; reusing a nonce across seeds leaks the key.
    pub fn prove_with_nonce(
        &self,
        params: &CurveParams,
        seed: &BigUint,
        nonce: &BigUint,
        max_iterations: usize,
    ) -> Result<Proof> {
        let k = params.scalar(nonce);
        if bool::from(k.is_zero()) {
            return Err(CryptoError::InvalidInput {
                reason: "nonce is zero modulo the group order".to_string(),
            }
            .into());
        }
        self.prove_with_scalar_nonce(params, seed, k, max_iterations)
    }

    fn prove_with_scalar_nonce(
        &self,
        params: &CurveParams,
        seed: &BigUint,
        k: Scalar,
        max_iterations: usize,
    ) -> Result<Proof> {
        let x = self.scalar();
        let public_key = self.public_key()?;
        let h = hash_to_curve(params, &public_key, seed, max_iterations)?;
        let gamma = CurvePoint::from_projective(h.to_projective() * x)?;

        let u = CurvePoint::from_projective(ProjectivePoint::GENERATOR * k)?;
        let v = CurvePoint::from_projective(h.to_projective() * k)?;
        let u_witness = EthAddress::from_point(&u);

        let c = scalar_from_curve_points(params, &h, &public_key, &gamma, &u_witness, &v)
            % &params.group_order;
        let s_scalar = k - params.scalar(&c) * x;
        let s = BigUint::from_bytes_be(&s_scalar.to_repr());

        let output = BigUint::from_bytes_be(&keccak256_concat(&[
            &params.output_prefix[..],
            &gamma.to_bytes()[..],
        ]));

        Ok(Proof::new(public_key, gamma, c, s, seed.clone(), output))
    }
}

impl fmt::Debug for VrfSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VrfSecretKey(..)")
    }
}
