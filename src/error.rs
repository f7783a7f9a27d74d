//! Error types for the VRF oracle library

use thiserror::Error;

/// Result type alias for VRF oracle operations
pub type Result<T> = std::result::Result<T, VrfError>;

/// Main error type for VRF oracle operations
#[derive(Error, Debug)]
pub enum VrfError {
    /// Cryptographic errors
    #[error("Cryptographic error: {0}")]
    Crypto(#[from] CryptoError),

    /// Proof verification rejected the proof
    #[error("Verification failed: {0}")]
    Verification(#[from] VerificationFailure),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// Request parameters failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Provider answered with a non-zero status code
    #[error("Provider error {code}: {message}")]
    Provider { code: i64, message: String },

    /// Provider returned data bound to a different request
    #[error("Request id mismatch: expected {expected}, got {actual}")]
    RequestIdMismatch { expected: String, actual: String },

    /// Provider answered with a proof for a key other than the requested one
    #[error("Key hash mismatch: requested {expected}, proof key hashes to {actual}")]
    KeyHashMismatch { expected: String, actual: String },

    /// Provider endpoint could not be reached
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider endpoint answered with a non-success HTTP status
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Provider call did not complete in time
    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Cryptographic error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Coordinates do not describe a point on the curve
    #[error("Invalid curve point: {reason}")]
    InvalidPoint { reason: String },

    /// Arithmetic produced the point at infinity
    #[error("Point at infinity is not a valid protocol point")]
    PointAtInfinity,

    /// Input outside the domain of a primitive
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A rehash loop ran past its iteration cap
    #[error("{operation} exceeded {limit} iterations")]
    IterationLimitExceeded {
        operation: &'static str,
        limit: usize,
    },

    /// Invalid private key
    #[error("Invalid private key: {reason}")]
    InvalidPrivateKey { reason: String },
}

/// Reasons a VRF proof is not accepted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationFailure {
    /// Structural precondition violated, no arithmetic was performed
    #[error("badly-formatted proof: {reason}")]
    MalformedProof { reason: String },

    /// c*gamma equals s*hash, which the on-chain verifier refuses
    #[error("c*γ = s*hash (disallowed in solidity verifier)")]
    DegenerateProof,

    /// Proof equations do not hold
    #[error("invalid proof: {reason}")]
    InvalidProof { reason: String },

    /// The verifier itself failed, e.g. a rehash loop hit its cap
    #[error("internal verifier error: {reason}")]
    Internal { reason: String },
}

/// Serialization error types
#[derive(Error, Debug)]
pub enum SerializationError {
    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Hex decoding error
    #[error("Hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Invalid value format
    #[error("Invalid format for {field}: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },
}

impl VrfError {
    /// Create a validation error
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        VrfError::Validation(msg.into())
    }

    /// Create a configuration error
    pub fn config<T: Into<String>>(msg: T) -> Self {
        VrfError::Config(msg.into())
    }
}

impl VerificationFailure {
    pub fn malformed<T: Into<String>>(reason: T) -> Self {
        VerificationFailure::MalformedProof {
            reason: reason.into(),
        }
    }

    pub fn invalid<T: Into<String>>(reason: T) -> Self {
        VerificationFailure::InvalidProof {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for VrfError {
    fn from(err: serde_json::Error) -> Self {
        VrfError::Serialization(SerializationError::Json(err))
    }
}

impl From<hex::FromHexError> for VrfError {
    fn from(err: hex::FromHexError) -> Self {
        VrfError::Serialization(SerializationError::Hex(err))
    }
}
