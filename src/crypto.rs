//! Cryptographic primitives behind the secp256k1 VRF

pub mod address;
pub mod challenge;
pub mod curve;
pub mod field;
pub mod hash;
pub mod prover;

// Re-export commonly used types
pub use address::{key_hash, EthAddress};
pub use challenge::scalar_from_curve_points;
pub use curve::{is_valid_point, CurveParams, CurvePoint};
pub use field::{field_hash, hash_to_curve, DEFAULT_MAX_HASH_ITERATIONS};
pub use hash::{keccak256, keccak256_concat};
pub use prover::VrfSecretKey;
