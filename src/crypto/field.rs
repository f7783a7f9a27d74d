//! Hashing into the base field and onto the curve

use crate::crypto::curve::{CurveParams, CurvePoint};
use crate::crypto::hash::{bytes_to_hash, keccak256, HASH_LENGTH};
use crate::error::{CryptoError, Result};
use num_bigint::BigUint;
use tracing::debug;

/// Default cap on rehash rounds for both field and curve hashing
pub const DEFAULT_MAX_HASH_ITERATIONS: usize = 256;

/// Big-endian, zero-padded 32-byte encoding of a value that fits in 256 bits.
pub fn uint256_to_bytes32(value: &BigUint) -> Result<[u8; HASH_LENGTH]> {
    if value.bits() > (HASH_LENGTH as u64) * 8 {
        return Err(CryptoError::InvalidInput {
            reason: "too big to marshal to uint256".to_string(),
        }
        .into());
    }
    Ok(bytes_to_hash(&value.to_bytes_be()))
}

/// keccak256(message) as an element of the base field.
///
/// Digests at or above `p` are rehashed until one lands below it.
pub fn field_hash(params: &CurveParams, message: &[u8], max_iterations: usize) -> Result<BigUint> {
    let mut rv = BigUint::from_bytes_be(&keccak256(message));
    let mut rounds = 0;
    while rv >= params.field_size {
        if rounds >= max_iterations {
            return Err(CryptoError::IterationLimitExceeded {
                operation: "field hash",
                limit: max_iterations,
            }
            .into());
        }
        rv = BigUint::from_bytes_be(&keccak256(&bytes_to_hash(&rv.to_bytes_be())));
        rounds += 1;
    }
    Ok(rv)
}

/// Deterministically map `(p, seed)` to a curve point with even y.
pub fn hash_to_curve(
    params: &CurveParams,
    p: &CurvePoint,
    seed: &BigUint,
    max_iterations: usize,
) -> Result<CurvePoint> {
    let seed_bytes = uint256_to_bytes32(seed).map_err(|_| CryptoError::InvalidInput {
        reason: "bad input to hash to curve: seed exceeds 32 bytes".to_string(),
    })?;

    let mut message = Vec::with_capacity(4 * HASH_LENGTH);
    message.extend_from_slice(&params.hash_to_curve_prefix);
    message.extend_from_slice(&p.to_bytes());
    message.extend_from_slice(&seed_bytes);

    let mut x = field_hash(params, &message, max_iterations)?;
    let mut attempts = 0;
    while !params.is_curve_x_ordinate(&x) {
        if attempts >= max_iterations {
            return Err(CryptoError::IterationLimitExceeded {
                operation: "hash to curve",
                limit: max_iterations,
            }
            .into());
        }
        x = field_hash(params, &bytes_to_hash(&x.to_bytes_be()), max_iterations)?;
        attempts += 1;
    }
    debug!("hash to curve found x coordinate after {} retries", attempts);

    let y = params.square_root(&params.y_squared(&x));
    let point = CurvePoint::from_coordinates(&x, &y)?;
    if point.has_odd_y() {
        return Ok(point.negate());
    }
    Ok(point)
}
