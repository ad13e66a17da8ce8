// src/services/certificate_issuer.rs
//! Certificate Issuance Service
//!
//! Issues a signed certificate for a student who completed a course. The flow:
//! 1. Authorize: the caller is a professor who owns the course
//! 2. Check that the student completed the course
//! 3. Assemble the certificate facts with `issued_at` at midnight UTC of today
//! 4. Render and upload the certificate document
//! 5. Sign the canonical facts and persist a single certificate record
//!
//! Any failure aborts issuance; the certificate record is written last, so no
//! partial certificate is ever stored.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::crypto::signature::CertificateSigner;
use crate::error::CertificateError;
use crate::models::certificate::{generate_readable_code, CertificateFacts, CertificateRecord};
use crate::models::profile::Role;
use crate::rendering::{CertificateRenderer, ColorScheme, RenderInput};
use crate::storage::{CertificateStore, ObjectStore};
use crate::utils::serialization::canonicalize;

/// Body of an issuance request.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct IssueRequest {
    pub student_id: String,
    pub course_id: String,
}

/// What the caller gets back after a successful issuance.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct IssuedCertificate {
    pub cert_id: Uuid,
    pub readable_code: String,
    pub pdf_url: String,
    pub facts: CertificateFacts,
    /// Base64 RSA-PSS signature over the canonical facts.
    pub signature: String,
    pub issued_date: NaiveDate,
}

/// Service issuing signed course certificates.
pub struct CertificateIssuer<S, O> {
    store: Arc<S>,
    objects: Arc<O>,
    renderer: Box<dyn CertificateRenderer>,
    signer: CertificateSigner,
    bucket: String,
    verification_base_url: String,
}

impl<S: CertificateStore, O: ObjectStore> CertificateIssuer<S, O> {
    /// Builds the service from configuration.
    ///
    /// # Errors
    /// - `MissingKey` when `UNIVERSITY_PRIVATE_KEY` is not configured
    /// - `Key` when the configured key cannot be decoded or imported
    pub fn new(
        config: &AppConfig,
        store: Arc<S>,
        objects: Arc<O>,
        renderer: Box<dyn CertificateRenderer>,
    ) -> Result<Self, CertificateError> {
        let pem = config
            .university_private_key
            .as_deref()
            .ok_or(CertificateError::MissingKey("UNIVERSITY_PRIVATE_KEY"))?;
        let signer = CertificateSigner::from_pem(pem)?;

        Ok(Self {
            store,
            objects,
            renderer,
            signer,
            bucket: config.pdf_bucket.clone(),
            verification_base_url: config.verification_base_url.clone(),
        })
    }

    /// Issues a certificate dated today (UTC).
    pub async fn issue(
        &self,
        caller_id: &str,
        request: &IssueRequest,
    ) -> Result<IssuedCertificate, CertificateError> {
        self.issue_at(caller_id, request, Utc::now()).await
    }

    /// Issues a certificate as if the request arrived at `now`.
    ///
    /// Only the UTC calendar date of `now` reaches the signed facts.
    pub async fn issue_at(
        &self,
        caller_id: &str,
        request: &IssueRequest,
        now: DateTime<Utc>,
    ) -> Result<IssuedCertificate, CertificateError> {
        let IssueRequest {
            student_id,
            course_id,
        } = request;
        debug!("Issuance requested by {} for {}/{}", caller_id, student_id, course_id);

        let professor = match self.store.profile(caller_id).await? {
            Some(profile) if profile.role == Role::Professor => profile,
            _ => {
                warn!("Rejected issuance: {} is not a professor", caller_id);
                return Err(CertificateError::NotProfessor);
            }
        };

        let course = self
            .store
            .course(course_id)
            .await?
            .ok_or_else(|| CertificateError::CourseNotFound(course_id.clone()))?;
        if course.professor_id != professor.id {
            warn!("Rejected issuance: {} does not own course {}", caller_id, course_id);
            return Err(CertificateError::NotCourseOwner(course_id.clone()));
        }

        let completed = self
            .store
            .enrollment(student_id, course_id)
            .await?
            .is_some_and(|enrollment| enrollment.is_completed());
        if !completed {
            return Err(CertificateError::EnrollmentIncomplete {
                student_id: student_id.clone(),
                course_id: course_id.clone(),
            });
        }

        let student = self
            .store
            .profile(student_id)
            .await?
            .ok_or_else(|| CertificateError::StudentNotFound(student_id.clone()))?;

        let issued_date = now.date_naive();
        let facts =
            CertificateFacts::from_sources(student_id, course_id, &student, &course, issued_date);
        let cert_id = Uuid::new_v4();
        let readable_code = generate_readable_code();
        debug!("Certificate facts before signing: {:?}", facts);

        let pdf_url = self
            .store_document(&facts, cert_id, &readable_code, &professor.full_name())
            .await?;

        let signature = self.signer.sign_base64(&canonicalize(&facts))?;
        debug!(
            "Signature generated for {}: {}...",
            readable_code,
            &signature[..signature.len().min(50)]
        );

        let record = CertificateRecord {
            id: cert_id,
            readable_code: readable_code.clone(),
            student_id: student_id.clone(),
            course_id: course_id.clone(),
            digital_signature: signature.clone(),
            issued_date,
            revoked: false,
            revoked_at: None,
            expiration_date: None,
            pdf_url: pdf_url.clone(),
        };
        self.store.insert_certificate(record).await?;
        info!("Issued certificate {} ({})", readable_code, cert_id);

        Ok(IssuedCertificate {
            cert_id,
            readable_code,
            pdf_url,
            facts,
            signature,
            issued_date,
        })
    }

    /// Renders and uploads the certificate document, returning its public URL.
    async fn store_document(
        &self,
        facts: &CertificateFacts,
        cert_id: Uuid,
        readable_code: &str,
        professor_name: &str,
    ) -> Result<String, CertificateError> {
        let color_index = rand::thread_rng().gen_range(0..ColorScheme::ALL.len());
        let input = RenderInput {
            facts,
            certificate_id: cert_id,
            readable_code,
            professor_name,
            verification_url: format!("{}{}", self.verification_base_url, cert_id),
            color_index,
        };
        let document = self.renderer.render(&input)?;
        debug!("Rendered document for {}: {} bytes", readable_code, document.len());

        let filename = format!("{}-certificado.{}", readable_code, self.renderer.extension());
        self.objects
            .upload(&self.bucket, &filename, document, self.renderer.content_type())
            .await
            .map_err(CertificateError::Upload)?;

        Ok(self.objects.public_url(&self.bucket, &filename))
    }
}
