// src/models/certificate.rs
//! Certificate data model.
//!
//! Two shapes live here:
//! - [`CertificateFacts`]: the payload protected by the digital signature.
//! - [`CertificateRecord`]: the row persisted once per issued certificate.
//!
//! # Signed payload
//! The facts are serialized as a JSON object whose keys appear exactly in the
//! order of [`FACT_FIELD_ORDER`]. Issuance and verification both go through the
//! same [`Serialize`] implementation, so the signed bytes can be rebuilt from
//! storage long after issuance.

use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::models::profile::{Course, Profile};
use crate::utils::serialization::{format_timestamp, issued_at_for};

/// One key of the signed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactField {
    StudentId,
    CourseId,
    StudentName,
    StudentEmail,
    CourseName,
    Skills,
    IssuedAt,
}

impl FactField {
    /// JSON key written for this field.
    pub const fn key(self) -> &'static str {
        match self {
            FactField::StudentId => "student_id",
            FactField::CourseId => "course_id",
            FactField::StudentName => "student_name",
            FactField::StudentEmail => "student_email",
            FactField::CourseName => "course_name",
            FactField::Skills => "skills",
            FactField::IssuedAt => "issued_at",
        }
    }
}

/// Key order of the signed payload. Changing it invalidates every issued signature.
pub const FACT_FIELD_ORDER: [FactField; 7] = [
    FactField::StudentId,
    FactField::CourseId,
    FactField::StudentName,
    FactField::StudentEmail,
    FactField::CourseName,
    FactField::Skills,
    FactField::IssuedAt,
];

/// Facts about a completed course that the issuer signs.
///
/// `issued_at` is always midnight UTC of the stored issue date; build it with
/// [`CertificateFacts::from_sources`] rather than from the current time.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CertificateFacts {
    pub student_id: String,
    pub course_id: String,
    pub student_name: String,
    pub student_email: String,
    pub course_name: String,
    pub skills: Option<Vec<String>>,
    pub issued_at: DateTime<Utc>,
}

impl CertificateFacts {
    /// Assembles the facts from the rows they are derived from.
    ///
    /// Used by issuance (ids from the request) and by verification (ids from
    /// the persisted record), so both sides agree on every field.
    pub fn from_sources(
        student_id: &str,
        course_id: &str,
        student: &Profile,
        course: &Course,
        issued_date: NaiveDate,
    ) -> Self {
        Self {
            student_id: student_id.to_string(),
            course_id: course_id.to_string(),
            student_name: student.full_name(),
            student_email: student.email.clone(),
            course_name: course.title.clone(),
            skills: course.skills.clone(),
            issued_at: issued_at_for(issued_date),
        }
    }
}

impl Serialize for CertificateFacts {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("CertificateFacts", FACT_FIELD_ORDER.len())?;
        for field in FACT_FIELD_ORDER {
            let key = field.key();
            match field {
                FactField::StudentId => state.serialize_field(key, &self.student_id)?,
                FactField::CourseId => state.serialize_field(key, &self.course_id)?,
                FactField::StudentName => state.serialize_field(key, &self.student_name)?,
                FactField::StudentEmail => state.serialize_field(key, &self.student_email)?,
                FactField::CourseName => state.serialize_field(key, &self.course_name)?,
                FactField::Skills => state.serialize_field(key, &self.skills)?,
                FactField::IssuedAt => {
                    state.serialize_field(key, &format_timestamp(&self.issued_at))?
                }
            }
        }
        state.end()
    }
}

/// Persisted certificate row.
///
/// Written once by the issuance service. `revoked`, `revoked_at` and
/// `expiration_date` are maintained by administrative tooling and only read
/// here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CertificateRecord {
    pub id: Uuid,
    pub readable_code: String,
    pub student_id: String,
    pub course_id: String,
    /// Base64 RSA-PSS signature over the canonical facts.
    pub digital_signature: String,
    pub issued_date: NaiveDate,
    #[serde(default)]
    pub revoked: bool,
    #[serde(default)]
    pub revoked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
    pub pdf_url: String,
}

impl CertificateRecord {
    pub fn is_revoked(&self) -> bool {
        self.revoked || self.revoked_at.is_some()
    }
}

/// Human-facing code printed on the certificate, e.g. `CERT-1A2B3C4D`.
pub fn generate_readable_code() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("CERT-{}", random[..8].to_uppercase())
}
