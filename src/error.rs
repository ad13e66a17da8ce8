// src/error.rs
//! Error types for certificate issuance and verification.
//!
//! Only infrastructural and authorization failures are errors. A signature that
//! does not verify is a normal verification outcome and is reported through
//! [`crate::models::verification::VerificationStatus`] instead.

use thiserror::Error;

/// Failures while decoding or importing key material.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The PEM body is not valid base64.
    #[error("Failed to decode PEM body: {0}")]
    Armor(String),

    /// The DER bytes could not be imported as an RSA key.
    #[error("Failed to import RSA key: {0}")]
    Import(String),
}

/// Failures reported by storage collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A row or object with the same key already exists.
    #[error("Duplicate key: {0}")]
    Duplicate(String),

    /// The backend failed for any other reason.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Errors surfaced by the issuance and verification services.
#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("Caller is not a professor")]
    NotProfessor,

    #[error("Caller is not the owner of course {0}")]
    NotCourseOwner(String),

    #[error("Student {student_id} has not completed course {course_id}")]
    EnrollmentIncomplete {
        student_id: String,
        course_id: String,
    },

    #[error("Student not found: {0}")]
    StudentNotFound(String),

    #[error("Course not found: {0}")]
    CourseNotFound(String),

    #[error("Certificate not found: {0}")]
    CertificateNotFound(String),

    /// The configuration does not carry the key this operation needs.
    #[error("Missing key material: {0}")]
    MissingKey(&'static str),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Upload failed: {0}")]
    Upload(#[source] StoreError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<rsa::signature::Error> for CertificateError {
    fn from(err: rsa::signature::Error) -> Self {
        CertificateError::Signing(err.to_string())
    }
}
