// src/main.rs

//! # Course Certificates - Main Entry Point
//!
//! Loads configuration, builds the storage collaborators and the two services,
//! then starts the API server.
//!
//! ## Environment Variables
//! See [`course_certs::config`]. `JWT_SECRET` is required; each service is
//! only enabled when its key is configured.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use log::{info, warn};

use course_certs::config::AppConfig;
use course_certs::error::CertificateError;
use course_certs::rendering::TextRenderer;
use course_certs::services::api_server::ApiServer;
use course_certs::services::certificate_issuer::CertificateIssuer;
use course_certs::services::verifier::Verifier;
use course_certs::storage::{MemoryObjectStore, MemoryStore};

/// Main application entry point
///
/// # Initialization Sequence
/// 1. Load environment configuration
/// 2. Build the certificate and document stores
/// 3. Initialize the issuance and verification services
/// 4. Start API server
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().context("Failed to read configuration")?;
    info!("Loaded configuration: {:?}", config);

    let store = match &config.seed_path {
        Some(path) => MemoryStore::from_seed_file(path)
            .with_context(|| format!("Failed to load seed file {}", path.display()))?,
        None => MemoryStore::new(),
    };
    let store = Arc::new(store);
    let objects = Arc::new(MemoryObjectStore::new(config.storage_public_url.clone()));

    let issuer = match CertificateIssuer::new(
        &config,
        store.clone(),
        objects,
        Box::new(TextRenderer::new()),
    ) {
        Ok(issuer) => Some(issuer),
        Err(CertificateError::MissingKey(name)) => {
            warn!("{} is not set; issuance is disabled", name);
            None
        }
        Err(e) => return Err(e).context("Failed to initialize certificate issuer"),
    };

    let verifier = match Verifier::new(&config, store) {
        Ok(verifier) => Some(verifier),
        Err(CertificateError::MissingKey(name)) => {
            warn!("{} is not set; verification is disabled", name);
            None
        }
        Err(e) => return Err(e).context("Failed to initialize verifier"),
    };

    let jwt_secret = config
        .jwt_secret
        .clone()
        .context("JWT_SECRET must be set")?;

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .with_context(|| format!("Invalid BIND_ADDRESS {}", config.bind_address))?;

    let api_server = ApiServer::new(issuer, verifier, jwt_secret);

    info!("Available endpoints:");
    info!("- POST /issue-certificate");
    info!("- GET  /verify-certificate?id=<uuid>");

    api_server.run(addr).await.context("API server failed")?;
    Ok(())
}
