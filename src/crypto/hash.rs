//! Keccak-256 helpers

use sha3::{Digest, Keccak256};

/// Length in bytes of a keccak digest and of every serialized coordinate
pub const HASH_LENGTH: usize = 32;

/// Compute Keccak-256 hash (Ethereum style)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash multiple pieces of data together, equivalent to hashing their concatenation
pub fn keccak256_concat(data_pieces: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for piece in data_pieces {
        hasher.update(piece);
    }
    hasher.finalize().into()
}

/// Last 32 bytes of `b`, left padded with zeros when shorter.
pub fn bytes_to_hash(b: &[u8]) -> [u8; HASH_LENGTH] {
    let mut hash = [0u8; HASH_LENGTH];
    if b.len() > HASH_LENGTH {
        hash.copy_from_slice(&b[b.len() - HASH_LENGTH..]);
    } else {
        hash[HASH_LENGTH - b.len()..].copy_from_slice(b);
    }
    hash
}
