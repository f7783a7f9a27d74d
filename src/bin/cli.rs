//! VRF Oracle CLI application

use clap::{Parser, Subcommand};
use num_bigint::BigUint;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{error, info, Level};
use vrf_oracle_rust::utils::{current_time_secs, parse_hex_biguint};
use vrf_oracle_rust::{
    compute_request_id, MemoryProvider, Proof, ProofOrigin, Result, VrfClient, VrfConfig,
    VrfError, VrfProof, VrfSecretKey, VrfVerifier,
};

#[derive(Parser)]
#[command(name = "vrf-cli")]
#[command(about = "Verify VRF proofs and compute request ids")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a proof read from a JSON file
    Verify {
        /// File holding a provider proof record or a bare proof
        file: PathBuf,
    },
    /// Compute the id of a randomness request
    RequestId {
        #[arg(long)]
        agent: String,
        #[arg(long)]
        seed: String,
        /// Unix seconds, defaults to now
        #[arg(long)]
        timestamp: Option<u64>,
        #[arg(long)]
        callback: String,
        #[arg(long, default_value_t = vrf_oracle_rust::config::VRF_VERSION)]
        version: u64,
    },
    /// Generate a new VRF keypair
    Keygen,
    /// Prove a seed with a private key and print the proof JSON
    Prove {
        /// Hex private key
        #[arg(long)]
        key: String,
        /// Hex seed
        #[arg(long)]
        seed: String,
    },
    /// List the providers served at `api_base_server`
    Providers,
    /// Fetch a proof from `api_base_server` and verify it
    Query {
        /// Request id the proof was issued for
        request_id: String,
    },
    /// Run a request against an in-process provider and verify the result
    Demo {
        #[arg(long, default_value = "0x1234")]
        seed: String,
    },
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    if let Err(e) = run(cli).await {
        error!("{}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => VrfConfig::from_file(path)?,
        None => VrfConfig::default(),
    };

    match cli.command {
        Commands::Verify { file } => {
            let contents = std::fs::read_to_string(&file)?;
            let proof = parse_proof(&contents)?;
            let verifier = VrfVerifier::with_config(config.verifier());
            let output = verifier.verify(&proof)?;
            info!("proof in {} verified", file.display());
            println!("Output: {}", output);
        },
        Commands::RequestId {
            agent,
            seed,
            timestamp,
            callback,
            version,
        } => {
            let timestamp = timestamp.unwrap_or_else(current_time_secs);
            let id = compute_request_id(version, &agent, &seed, timestamp, &callback)?;
            println!("{}", id);
        },
        Commands::Keygen => {
            let key = VrfSecretKey::random();
            let provider = MemoryProvider::with_key(key.clone()).descriptor()?;
            let public_key = key.public_key()?;

            println!("Generated new keypair:");
            println!("Private key: {}", key.to_hex());
            println!("Public key: {}", public_key);
            println!("Address: {}", provider.address);
            println!("Key hash: {}", provider.key_hash);
        },
        Commands::Prove { key, seed } => {
            let key = VrfSecretKey::from_hex(&key)?;
            let seed: BigUint = parse_hex_biguint("seed", &seed)?;
            let verifier = VrfVerifier::with_config(config.verifier());
            let proof = key.prove(verifier.params(), &seed, config.max_hash_iterations)?;
            println!("{}", serde_json::to_string_pretty(&proof.to_origin())?);
        },
        Commands::Providers => {
            let client = VrfClient::http(config)?;
            for provider in client.get_providers().await? {
                println!("{} {}", provider.address, provider.key_hash);
            }
        },
        Commands::Query { request_id } => {
            let client = VrfClient::http(config)?;
            let verified = client.query_proof(&request_id).await?;
            println!("Request: {}", verified.request_id);
            println!("Output: {}", verified.output);
        },
        Commands::Demo { seed } => {
            let provider = Arc::new(MemoryProvider::new());
            let client = VrfClient::builder()
                .with_config(config)
                .with_api(provider)
                .build()?;

            let providers = client.get_providers().await?;
            let key_hash = providers
                .first()
                .map(|p| p.key_hash.clone())
                .ok_or_else(|| VrfError::validation("provider list is empty"))?;

            let agent = uuid::Uuid::new_v4().to_string();
            let request = client.build_request(
                &agent,
                &seed,
                &key_hash,
                &client.config().endpoint("/api/vrf/proof"),
            )?;
            info!("submitting request {}", request.request_id);

            let verified = client.request_randomness(&request).await?;
            println!("Request: {}", verified.request_id);
            println!("Output: {}", verified.output);
        },
        Commands::Version => {
            println!("VRF Oracle Rust v{}", vrf_oracle_rust::VERSION);
        },
    }

    Ok(())
}

/// Accept either a provider record (`requestId` + `proof`) or a bare proof
fn parse_proof(contents: &str) -> Result<Proof> {
    if let Ok(record) = serde_json::from_str::<VrfProof>(contents) {
        return Ok(record.convert()?);
    }
    let origin: ProofOrigin = serde_json::from_str(contents)?;
    Ok(Proof::from_origin(&origin)?)
}
