// src/config.rs
//! Process configuration.
//!
//! Read once at startup from the environment (after `.env` is loaded) and
//! passed explicitly to the services. Nothing below `main` reads environment
//! variables.
//!
//! ## Environment Variables
//! - `UNIVERSITY_PRIVATE_KEY`: PEM PKCS#8 RSA key used to sign certificates
//! - `UNIVERSITY_PUBLIC_KEY`: PEM SPKI RSA key used to verify certificates
//! - `VERIFICATION_BASE_URL`: (Optional) prefix for verification links
//! - `PDF_BUCKET`: (Optional) bucket receiving rendered documents
//! - `STORAGE_PUBLIC_URL`: (Optional) base of public document URLs
//! - `JWT_SECRET`: HS256 secret for bearer tokens (required by the server)
//! - `BIND_ADDRESS`: (Optional) listen address, default `127.0.0.1:3000`
//! - `SEED_PATH`: (Optional) JSON file preloading the in-memory store

use std::fmt;
use std::path::PathBuf;

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::CertificateError;

pub const DEFAULT_VERIFICATION_BASE_URL: &str = "http://localhost:5173/verify?id=";
pub const DEFAULT_PDF_BUCKET: &str = "PDF_CERTIFICATES";
pub const DEFAULT_STORAGE_PUBLIC_URL: &str = "http://localhost:54321/storage/v1/object/public";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

#[derive(Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub university_private_key: Option<String>,
    #[serde(default)]
    pub university_public_key: Option<String>,
    #[serde(default = "default_verification_base_url")]
    pub verification_base_url: String,
    #[serde(default = "default_pdf_bucket")]
    pub pdf_bucket: String,
    #[serde(default = "default_storage_public_url")]
    pub storage_public_url: String,
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

fn default_verification_base_url() -> String {
    DEFAULT_VERIFICATION_BASE_URL.to_string()
}

fn default_pdf_bucket() -> String {
    DEFAULT_PDF_BUCKET.to_string()
}

fn default_storage_public_url() -> String {
    DEFAULT_STORAGE_PUBLIC_URL.to_string()
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

impl AppConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, CertificateError> {
        Self::from_environment(Environment::default())
    }

    /// Reads an explicit environment source; tests pass a fixed map.
    pub fn from_environment(environment: Environment) -> Result<Self, CertificateError> {
        let settings = Config::builder().add_source(environment).build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Verification link printed on a certificate.
    pub fn verification_url(&self, certificate_id: &uuid::Uuid) -> String {
        format!("{}{}", self.verification_base_url, certificate_id)
    }
}

// Key material and secrets stay out of logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("AppConfig")
            .field("university_private_key", &redact(&self.university_private_key))
            .field("university_public_key", &redact(&self.university_public_key))
            .field("verification_base_url", &self.verification_base_url)
            .field("pdf_bucket", &self.pdf_bucket)
            .field("storage_public_url", &self.storage_public_url)
            .field("jwt_secret", &redact(&self.jwt_secret))
            .field("bind_address", &self.bind_address)
            .field("seed_path", &self.seed_path)
            .finish()
    }
}
