//! Fiat-Shamir challenge derivation

use crate::crypto::address::{EthAddress, ADDRESS_LENGTH};
use crate::crypto::curve::{CurveParams, CurvePoint};
use crate::crypto::hash::{keccak256, HASH_LENGTH};
use num_bigint::BigUint;

/// Bytes hashed to form the challenge: prefix, four points, witness
pub const CHALLENGE_PREIMAGE_LENGTH: usize = HASH_LENGTH + 4 * 2 * HASH_LENGTH + ADDRESS_LENGTH;

/// keccak256(prefix ‖ hash ‖ pk ‖ gamma ‖ v ‖ u_witness) as an unsigned integer.
///
/// The value is not reduced modulo the group order here.
pub fn scalar_from_curve_points(
    params: &CurveParams,
    hash: &CurvePoint,
    pk: &CurvePoint,
    gamma: &CurvePoint,
    u_witness: &EthAddress,
    v: &CurvePoint,
) -> BigUint {
    BigUint::from_bytes_be(&keccak256(&challenge_preimage(params, hash, pk, gamma, u_witness, v)))
}

fn challenge_preimage(
    params: &CurveParams,
    hash: &CurvePoint,
    pk: &CurvePoint,
    gamma: &CurvePoint,
    u_witness: &EthAddress,
    v: &CurvePoint,
) -> Vec<u8> {
    let mut merged = Vec::with_capacity(CHALLENGE_PREIMAGE_LENGTH);
    merged.extend_from_slice(&params.scalar_from_curve_prefix);
    for point in [hash, pk, gamma, v] {
        merged.extend_from_slice(&point.to_bytes());
    }
    merged.extend_from_slice(u_witness.as_bytes());
    merged
}
