//! VRF proof tuple and its wire form

use crate::crypto::curve::{CurveParams, CurvePoint};
use crate::crypto::hash::HASH_LENGTH;
use crate::error::VerificationFailure;
use crate::utils::{biguint_to_hex, parse_hex_biguint};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Proof that `gamma` was constructed from `seed` as mandated by `public_key`.
#[derive(Clone, PartialEq, Eq)]
pub struct Proof {
    pub public_key: CurvePoint,
    pub gamma: CurvePoint,
    pub c: BigUint,
    pub s: BigUint,
    pub seed: BigUint,
    pub output: BigUint,
}

impl Proof {
    pub fn new(
        public_key: CurvePoint,
        gamma: CurvePoint,
        c: BigUint,
        s: BigUint,
        seed: BigUint,
        output: BigUint,
    ) -> Self {
        Self {
            public_key,
            gamma,
            c,
            s,
            seed,
            output,
        }
    }

    /// Basic domain checks; nothing here multiplies a point.
    pub fn well_formed(&self, params: &CurveParams) -> Result<(), VerificationFailure> {
        if !self.public_key.is_valid() {
            return Err(VerificationFailure::malformed("public key is not on the curve"));
        }
        if !self.gamma.is_valid() {
            return Err(VerificationFailure::malformed("gamma is not on the curve"));
        }
        if self.c >= params.group_order {
            return Err(VerificationFailure::malformed("c is not below the group order"));
        }
        if self.s >= params.group_order {
            return Err(VerificationFailure::malformed("s is not below the group order"));
        }
        if self.output.bits() > (HASH_LENGTH as u64) * 8 {
            return Err(VerificationFailure::malformed("output exceeds 32 bytes"));
        }
        Ok(())
    }

    pub fn is_well_formed(&self, params: &CurveParams) -> bool {
        self.well_formed(params).is_ok()
    }

    /// Parse the provider's hex form. Bad hex or off-curve points are malformed proofs.
    pub fn from_origin(origin: &ProofOrigin) -> Result<Self, VerificationFailure> {
        let int = |field: &str, value: &str| {
            parse_hex_biguint(field, value).map_err(|e| VerificationFailure::malformed(e.to_string()))
        };
        let point = |name: &str, x: &str, y: &str| -> Result<CurvePoint, VerificationFailure> {
            let x = int(name, x)?;
            let y = int(name, y)?;
            CurvePoint::from_coordinates(&x, &y)
                .map_err(|e| VerificationFailure::malformed(format!("{}: {}", name, e)))
        };

        Ok(Self {
            public_key: point("public key", &origin.public_x, &origin.public_y)?,
            gamma: point("gamma", &origin.gamma_x, &origin.gamma_y)?,
            c: int("c", &origin.c)?,
            s: int("s", &origin.s)?,
            seed: int("seed", &origin.seed)?,
            output: int("output", &origin.output)?,
        })
    }

    pub fn to_origin(&self) -> ProofOrigin {
        ProofOrigin {
            public_x: format!("0x{}", hex::encode(self.public_key.x_bytes())),
            public_y: format!("0x{}", hex::encode(self.public_key.y_bytes())),
            gamma_x: format!("0x{}", hex::encode(self.gamma.x_bytes())),
            gamma_y: format!("0x{}", hex::encode(self.gamma.y_bytes())),
            c: biguint_to_hex(&self.c),
            s: biguint_to_hex(&self.s),
            seed: biguint_to_hex(&self.seed),
            output: biguint_to_hex(&self.output),
        }
    }
}

impl fmt::Debug for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "vrf.Proof{{PublicKey: {:?}, Gamma: {:?}, C:{:x}, S:{:x}, Seed:{:x}, Output:{:x}}}",
            self.public_key, self.gamma, self.c, self.s, self.seed, self.output
        )
    }
}

impl TryFrom<&ProofOrigin> for Proof {
    type Error = VerificationFailure;

    fn try_from(origin: &ProofOrigin) -> Result<Self, Self::Error> {
        Proof::from_origin(origin)
    }
}

/// Proof as a provider returns it: every field a `0x` hex string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofOrigin {
    pub public_x: String,
    pub public_y: String,
    pub gamma_x: String,
    pub gamma_y: String,
    pub c: String,
    pub s: String,
    pub seed: String,
    pub output: String,
}

/// A provider's proof record, tied to the request that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VrfProof {
    pub request_id: String,
    pub proof: ProofOrigin,
}

impl VrfProof {
    pub fn convert(&self) -> Result<Proof, VerificationFailure> {
        Proof::from_origin(&self.proof)
    }
}
