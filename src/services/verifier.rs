// src/services/verifier.rs
//! Certificate verification service.
//!
//! Loads a persisted certificate, applies the validity state machine from
//! [`crate::services::status`], and only for current certificates rebuilds the
//! signed facts from storage and checks the stored signature against them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::crypto::signature::CertificateVerifier;
use crate::error::CertificateError;
use crate::models::certificate::CertificateFacts;
use crate::models::verification::{MissingData, VerificationReport, VerificationStatus};
use crate::services::status::{lifecycle_status, signature_status};
use crate::storage::CertificateStore;
use crate::utils::serialization::{canonicalize, payload_digest_hex};

/// Answers whether a certificate is authentic, current and unaltered.
pub struct Verifier<S> {
    store: Arc<S>,
    verifier: CertificateVerifier,
}

impl<S: CertificateStore> Verifier<S> {
    /// Builds the service from configuration.
    ///
    /// # Errors
    /// - `MissingKey` when `UNIVERSITY_PUBLIC_KEY` is not configured
    /// - `Key` when the configured key cannot be decoded or imported
    pub fn new(config: &AppConfig, store: Arc<S>) -> Result<Self, CertificateError> {
        let pem = config
            .university_public_key
            .as_deref()
            .ok_or(CertificateError::MissingKey("UNIVERSITY_PUBLIC_KEY"))?;

        Ok(Self {
            store,
            verifier: CertificateVerifier::from_pem(pem)?,
        })
    }

    /// Verifies the certificate against the current time.
    pub async fn verify_certificate(
        &self,
        certificate_id: &str,
    ) -> Result<VerificationReport, CertificateError> {
        self.verify_at(certificate_id, Utc::now()).await
    }

    /// Verifies the certificate as of `now`.
    ///
    /// # Returns
    /// - `Ok(report)` for every outcome of the state machine, including a
    ///   signature that does not match
    /// - `Err(CertificateNotFound)` when no record exists for the id (an id
    ///   that is not a UUID cannot exist)
    /// - `Err(Store)` when a storage lookup fails
    pub async fn verify_at(
        &self,
        certificate_id: &str,
        now: DateTime<Utc>,
    ) -> Result<VerificationReport, CertificateError> {
        debug!("Verification requested for {}", certificate_id);
        let not_found = || CertificateError::CertificateNotFound(certificate_id.to_string());

        let id = Uuid::parse_str(certificate_id.trim()).map_err(|_| not_found())?;
        let record = self.store.certificate(&id).await?.ok_or_else(not_found)?;

        if let Some(status) = lifecycle_status(&record, now) {
            info!(
                "Certificate {} is {}",
                record.readable_code,
                status.reason_code().unwrap_or("current")
            );
            return Ok(VerificationReport::new(record, None, status));
        }

        let Some(student) = self.store.profile(&record.student_id).await? else {
            warn!("Student {} referenced by {} is missing", record.student_id, record.readable_code);
            let status = VerificationStatus::DataUnavailable {
                missing: MissingData::Student,
            };
            return Ok(VerificationReport::new(record, None, status));
        };
        let Some(course) = self.store.course(&record.course_id).await? else {
            warn!("Course {} referenced by {} is missing", record.course_id, record.readable_code);
            let status = VerificationStatus::DataUnavailable {
                missing: MissingData::Course,
            };
            return Ok(VerificationReport::new(record, None, status));
        };

        let facts = CertificateFacts::from_sources(
            &record.student_id,
            &record.course_id,
            &student,
            &course,
            record.issued_date,
        );
        let payload = canonicalize(&facts);
        debug!(
            "Rebuilt payload for {}: sha256 {}",
            record.readable_code,
            payload_digest_hex(&payload)
        );

        let matches = self.verifier.verify_base64(&record.digital_signature, &payload);
        let status = signature_status(matches);
        if matches {
            info!("Certificate {} verified", record.readable_code);
        } else {
            warn!("Signature mismatch for certificate {}", record.readable_code);
        }

        Ok(VerificationReport::new(record, Some(facts), status))
    }
}
