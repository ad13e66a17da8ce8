// src/services/status.rs
//! Validity state machine.
//!
//! Evaluation order, first match wins:
//! 1. not found (handled by the caller, no record to evaluate)
//! 2. revoked
//! 3. expired
//! 4. referenced data unavailable
//! 5. signature invalid
//! 6. valid
//!
//! States 2 and 3 depend on the record alone and are decided here before any
//! storage lookup or cryptography runs.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::certificate::CertificateRecord;
use crate::models::verification::VerificationStatus;
use crate::utils::serialization::midnight_utc;

/// `true` once `now` is strictly after midnight UTC of the expiration date.
pub fn is_expired(expiration_date: Option<NaiveDate>, now: DateTime<Utc>) -> bool {
    expiration_date.is_some_and(|date| midnight_utc(date) < now)
}

/// Revoked or expired status, or `None` when the record is still current.
pub fn lifecycle_status(
    record: &CertificateRecord,
    now: DateTime<Utc>,
) -> Option<VerificationStatus> {
    if record.is_revoked() {
        return Some(VerificationStatus::Revoked {
            revoked_at: record.revoked_at,
        });
    }
    match record.expiration_date {
        Some(expired_on) if is_expired(Some(expired_on), now) => {
            Some(VerificationStatus::Expired { expired_on })
        }
        _ => None,
    }
}

/// Final status once the facts were rebuilt and the signature checked.
pub fn signature_status(signature_matches: bool) -> VerificationStatus {
    if signature_matches {
        VerificationStatus::Valid
    } else {
        VerificationStatus::SignatureInvalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn record() -> CertificateRecord {
        CertificateRecord {
            id: Uuid::new_v4(),
            readable_code: "CERT-12345678".into(),
            student_id: "s1".into(),
            course_id: "c1".into(),
            digital_signature: "not-a-signature".into(),
            issued_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            revoked: false,
            revoked_at: None,
            expiration_date: None,
            pdf_url: String::new(),
        }
    }

    #[test]
    fn test_expiration_boundary_is_strict() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let boundary = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

        assert!(!is_expired(Some(date), boundary));
        assert!(is_expired(Some(date), boundary + Duration::microseconds(1)));
        assert!(!is_expired(Some(date), boundary - Duration::microseconds(1)));
        assert!(!is_expired(None, boundary));
    }

    #[test]
    fn test_current_record_has_no_lifecycle_status() {
        assert_eq!(lifecycle_status(&record(), Utc::now()), None);
    }

    #[test]
    fn test_revoked_flag_or_timestamp() {
        let mut flagged = record();
        flagged.revoked = true;
        assert_eq!(
            lifecycle_status(&flagged, Utc::now()),
            Some(VerificationStatus::Revoked { revoked_at: None })
        );

        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut stamped = record();
        stamped.revoked_at = Some(at);
        assert_eq!(
            lifecycle_status(&stamped, Utc::now()),
            Some(VerificationStatus::Revoked {
                revoked_at: Some(at)
            })
        );
    }

    #[test]
    fn test_revocation_takes_precedence_over_expiration() {
        let mut both = record();
        both.revoked = true;
        both.expiration_date = NaiveDate::from_ymd_opt(2020, 1, 1);

        assert!(matches!(
            lifecycle_status(&both, Utc::now()),
            Some(VerificationStatus::Revoked { .. })
        ));
    }

    #[test]
    fn test_expired_record() {
        let mut expired = record();
        expired.expiration_date = NaiveDate::from_ymd_opt(2025, 6, 1);
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();

        assert_eq!(
            lifecycle_status(&expired, now),
            Some(VerificationStatus::Expired {
                expired_on: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
            })
        );
    }

    #[test]
    fn test_signature_status() {
        assert_eq!(signature_status(true), VerificationStatus::Valid);
        assert_eq!(signature_status(false), VerificationStatus::SignatureInvalid);
    }
}
