// src/models/verification.rs
//! Verification outcomes reported to callers.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::certificate::{CertificateFacts, CertificateRecord};

/// Referenced row that could not be loaded during verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingData {
    Student,
    Course,
}

/// Result of evaluating a stored certificate.
///
/// Variants are listed in precedence order: the first that applies wins.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationStatus {
    Revoked { revoked_at: Option<DateTime<Utc>> },
    Expired { expired_on: NaiveDate },
    DataUnavailable { missing: MissingData },
    SignatureInvalid,
    Valid,
}

impl VerificationStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationStatus::Valid)
    }

    /// Machine-readable reason, `None` for a valid certificate.
    pub fn reason_code(&self) -> Option<&'static str> {
        match self {
            VerificationStatus::Revoked { .. } => Some("revoked"),
            VerificationStatus::Expired { .. } => Some("expired"),
            VerificationStatus::DataUnavailable { .. } => Some("data_unavailable"),
            VerificationStatus::SignatureInvalid => Some("invalid_signature"),
            VerificationStatus::Valid => None,
        }
    }

    /// Sentence shown to the person checking the certificate.
    pub fn message(&self) -> String {
        match self {
            VerificationStatus::Revoked { revoked_at } => format!(
                "Certificate found but it was revoked on {}. This certificate is no longer valid.",
                revoked_at
                    .map(|at| format_display_date(at.date_naive()))
                    .unwrap_or_else(|| "an unknown date".to_string())
            ),
            VerificationStatus::Expired { expired_on } => format!(
                "Certificate found but it expired on {}. This certificate is no longer valid.",
                format_display_date(*expired_on)
            ),
            VerificationStatus::DataUnavailable { missing } => {
                let what = match missing {
                    MissingData::Student => "student",
                    MissingData::Course => "course",
                };
                format!(
                    "Certificate found but the {} data is not available. Contact the certificate issuer.",
                    what
                )
            }
            VerificationStatus::SignatureInvalid => "Certificate found but the digital signature is not valid. \
                 The data may have been modified. Contact the certificate issuer."
                .to_string(),
            VerificationStatus::Valid => {
                "Certificate is valid: the digital signature matches and the certificate is active."
                    .to_string()
            }
        }
    }
}

/// Day/month/year as printed in messages, e.g. `7/11/2025`.
pub fn format_display_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

/// Certificate metadata returned with every verification outcome.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CertificateSummary {
    pub id: Uuid,
    pub readable_code: String,
    pub student_id: String,
    pub course_id: String,
    pub issued_date: NaiveDate,
    pub pdf_url: String,
    pub revoked: bool,
    pub revoked_at: Option<DateTime<Utc>>,
    pub expiration_date: Option<NaiveDate>,
    /// Facts rebuilt from storage; absent when verification stopped before
    /// reconstruction.
    pub facts: Option<CertificateFacts>,
}

/// Structured answer to "is this certificate authentic and current?".
#[derive(Serialize, Debug, Clone)]
pub struct VerificationReport {
    pub valid: bool,
    pub reason: Option<&'static str>,
    pub message: String,
    pub certificate: CertificateSummary,
    #[serde(skip)]
    pub status: VerificationStatus,
}

impl VerificationReport {
    pub fn new(
        record: CertificateRecord,
        facts: Option<CertificateFacts>,
        status: VerificationStatus,
    ) -> Self {
        Self {
            valid: status.is_valid(),
            reason: status.reason_code(),
            message: status.message(),
            certificate: CertificateSummary {
                id: record.id,
                readable_code: record.readable_code,
                student_id: record.student_id,
                course_id: record.course_id,
                issued_date: record.issued_date,
                pdf_url: record.pdf_url,
                revoked: record.revoked,
                revoked_at: record.revoked_at,
                expiration_date: record.expiration_date,
                facts,
            },
            status,
        }
    }
}
