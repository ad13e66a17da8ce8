// src/utils/serialization.rs
//! Canonical serialization of certificate facts.
//!
//! Provides:
//! - The byte encoding that is signed at issuance and rebuilt at verification
//! - Timestamp rendering for the `issued_at` field
//! - Date-only to instant conversion (midnight UTC)

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use crate::models::certificate::CertificateFacts;

/// Encodes facts as the exact byte sequence covered by the signature.
///
/// The output is compact UTF-8 JSON with keys in
/// [`FACT_FIELD_ORDER`](crate::models::certificate::FACT_FIELD_ORDER), `skills`
/// as an array or `null`, and `issued_at` as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// # Panics
/// Never in practice: the facts contain only strings, which always serialize.
pub fn canonicalize(facts: &CertificateFacts) -> Vec<u8> {
    serde_json::to_vec(facts).expect("certificate facts always serialize to JSON")
}

/// Instant at 00:00:00 UTC of `date`.
pub fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// `issued_at` value for a certificate issued on `issued_date`.
///
/// Depends on the stored date only, never on the time of day of issuance or
/// of verification.
pub fn issued_at_for(issued_date: NaiveDate) -> DateTime<Utc> {
    midnight_utc(issued_date)
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Hex SHA-256 of a canonical payload, for diagnostics.
pub fn payload_digest_hex(payload: &[u8]) -> String {
    format!("{:x}", Sha256::digest(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{Course, Profile, Role};
    use chrono::{Duration, TimeZone};

    fn scenario_facts() -> CertificateFacts {
        CertificateFacts {
            student_id: "s1".into(),
            course_id: "c1".into(),
            student_name: "ANA LOPEZ".into(),
            student_email: "a@x.com".into(),
            course_name: "Intro to X".into(),
            skills: Some(vec!["A".into(), "B".into()]),
            issued_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_canonical_bytes_for_scenario() {
        let expected = r#"{"student_id":"s1","course_id":"c1","student_name":"ANA LOPEZ","student_email":"a@x.com","course_name":"Intro to X","skills":["A","B"],"issued_at":"2025-01-01T00:00:00.000Z"}"#;
        assert_eq!(canonicalize(&scenario_facts()), expected.as_bytes());
    }

    #[test]
    fn test_missing_skills_serialize_as_null() {
        let mut facts = scenario_facts();
        facts.skills = None;
        let text = String::from_utf8(canonicalize(&facts)).unwrap();
        assert!(text.contains(r#""skills":null,"issued_at""#));
    }

    #[test]
    fn test_empty_skills_serialize_as_empty_array() {
        let mut facts = scenario_facts();
        facts.skills = Some(vec![]);
        let text = String::from_utf8(canonicalize(&facts)).unwrap();
        assert!(text.contains(r#""skills":[],"#));
    }

    #[test]
    fn test_non_ascii_is_written_verbatim() {
        let mut facts = scenario_facts();
        facts.student_name = "JOSÉ NÚÑEZ \"EL PROFE\"".into();
        let text = String::from_utf8(canonicalize(&facts)).unwrap();
        assert!(text.contains(r#""student_name":"JOSÉ NÚÑEZ \"EL PROFE\"""#));
    }

    #[test]
    fn test_independent_construction_paths_agree() {
        let student = Profile {
            id: "s1".into(),
            role: Role::Student,
            first_name: "ANA".into(),
            last_name: "LOPEZ".into(),
            email: "a@x.com".into(),
        };
        let course = Course {
            id: "c1".into(),
            title: "Intro to X".into(),
            professor_id: "p1".into(),
            skills: Some(vec!["A".into(), "B".into()]),
        };
        let rebuilt = CertificateFacts::from_sources(
            "s1",
            "c1",
            &student,
            &course,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );

        assert_eq!(canonicalize(&rebuilt), canonicalize(&scenario_facts()));
    }

    #[test]
    fn test_format_timestamp_keeps_milliseconds() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 9, 8, 5, 1).unwrap() + Duration::milliseconds(7);
        assert_eq!(format_timestamp(&instant), "2025-03-09T08:05:01.007Z");
    }

    #[test]
    fn test_payload_digest_is_hex_sha256() {
        assert_eq!(
            payload_digest_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
