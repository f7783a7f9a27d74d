//! VRF Oracle - verifiable randomness client and verifier
//! Rust implementation

// Modules
pub mod client;
pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod proof;
pub mod provider;
pub mod request;
pub mod types;
pub mod utils;
pub mod verifier;

// Re-exports
pub use client::{VerifiedProof, VrfClient, VrfClientBuilder};
pub use config::{VerifierConfig, VrfConfig};
pub use crypto::{CurveParams, CurvePoint, EthAddress, VrfSecretKey};
pub use error::{CryptoError, Result, VerificationFailure, VrfError};
pub use models::{ApiResponse, Provider};
pub use proof::{Proof, ProofOrigin, VrfProof};
pub use provider::{HttpProvider, MemoryProvider, ProviderApi};
pub use request::{compute_request_id, VrfRequest};
pub use types::{RequestId, VrfOutput};
pub use verifier::{verify, VrfVerifier};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
