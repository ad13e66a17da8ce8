// tests/certificate_flow.rs
//! Issuance and verification end to end over the in-memory stores.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use config::{Environment, Map};
use uuid::Uuid;

use course_certs::config::AppConfig;
use course_certs::crypto::signature::CertificateVerifier;
use course_certs::models::certificate::{CertificateFacts, CertificateRecord};
use course_certs::models::profile::{Course, Enrollment, EnrollmentStatus, Profile, Role};
use course_certs::models::verification::VerificationStatus;
use course_certs::rendering::TextRenderer;
use course_certs::services::certificate_issuer::{CertificateIssuer, IssueRequest};
use course_certs::services::verifier::Verifier;
use course_certs::storage::{CertificateStore, MemoryObjectStore, MemoryStore};
use course_certs::utils::serialization::canonicalize;

const PRIVATE_PEM: &str = include_str!("fixtures/issuer_private.pem");
const PUBLIC_PEM: &str = include_str!("fixtures/issuer_public.pem");
const OTHER_PUBLIC_PEM: &str = include_str!("fixtures/other_public.pem");
/// Produced with `openssl pkeyutl -sign -pkeyopt rsa_padding_mode:pss
/// -pkeyopt rsa_pss_saltlen:32` over the scenario payload below.
const SCENARIO_SIGNATURE: &str = include_str!("fixtures/scenario_signature.b64");
const SCENARIO_PAYLOAD: &str = r#"{"student_id":"s1","course_id":"c1","student_name":"ANA LOPEZ","student_email":"a@x.com","course_name":"Intro to X","skills":["A","B"],"issued_at":"2025-01-01T00:00:00.000Z"}"#;

fn config() -> AppConfig {
    let mut vars: Map<String, String> = Map::new();
    vars.insert("UNIVERSITY_PRIVATE_KEY".into(), PRIVATE_PEM.into());
    vars.insert("UNIVERSITY_PUBLIC_KEY".into(), PUBLIC_PEM.into());
    vars.insert("STORAGE_PUBLIC_URL".into(), "https://files.example/public".into());
    AppConfig::from_environment(Environment::default().source(Some(vars))).unwrap()
}

fn student() -> Profile {
    Profile {
        id: "s1".into(),
        role: Role::Student,
        first_name: "ANA".into(),
        last_name: "LOPEZ".into(),
        email: "a@x.com".into(),
    }
}

fn course() -> Course {
    Course {
        id: "c1".into(),
        title: "Intro to X".into(),
        professor_id: "p1".into(),
        skills: Some(vec!["A".into(), "B".into()]),
    }
}

fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.insert_profile(Profile {
        id: "p1".into(),
        role: Role::Professor,
        first_name: "Eva".into(),
        last_name: "Ruiz".into(),
        email: "eva@x.com".into(),
    });
    store.insert_profile(student());
    store.insert_course(course());
    store.insert_enrollment(Enrollment {
        student_id: "s1".into(),
        course_id: "c1".into(),
        status: EnrollmentStatus::Completed,
    });
    store
}

/// Store holding one record that carries the externally produced scenario
/// signature, pointing at the given student, course and issue date.
async fn store_with_signed_record(
    student_id: &str,
    course_id: &str,
    issued_date: NaiveDate,
) -> (MemoryStore, Uuid) {
    let store = seeded_store();
    let id = Uuid::new_v4();
    store
        .insert_certificate(CertificateRecord {
            id,
            readable_code: "CERT-SCENARIO".into(),
            student_id: student_id.into(),
            course_id: course_id.into(),
            digital_signature: SCENARIO_SIGNATURE.trim().to_string(),
            issued_date,
            revoked: false,
            revoked_at: None,
            expiration_date: None,
            pdf_url: "https://files.example/public/PDF_CERTIFICATES/CERT-SCENARIO-certificado.txt"
                .into(),
        })
        .await
        .unwrap();
    (store, id)
}

/// Store holding the scenario certificate signed outside this crate.
async fn scenario_store() -> (MemoryStore, Uuid) {
    store_with_signed_record("s1", "c1", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()).await
}

#[test]
fn scenario_facts_produce_expected_payload() {
    let facts = CertificateFacts::from_sources(
        "s1",
        "c1",
        &student(),
        &course(),
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
    );
    assert_eq!(canonicalize(&facts), SCENARIO_PAYLOAD.as_bytes());
}

#[test]
fn externally_produced_signature_verifies() {
    let payload = SCENARIO_PAYLOAD.as_bytes();
    let issuer = CertificateVerifier::from_pem(PUBLIC_PEM).unwrap();
    let other = CertificateVerifier::from_pem(OTHER_PUBLIC_PEM).unwrap();

    assert!(issuer.verify_base64(SCENARIO_SIGNATURE.trim(), payload));
    assert!(!other.verify_base64(SCENARIO_SIGNATURE.trim(), payload));
    assert!(!issuer.verify_base64(SCENARIO_SIGNATURE.trim(), &payload[..payload.len() - 1]));
}

#[tokio::test]
async fn scenario_certificate_is_valid() {
    let (store, id) = scenario_store().await;
    let verifier = Verifier::new(&config(), Arc::new(store)).unwrap();

    let report = verifier.verify_certificate(&id.to_string()).await.unwrap();
    assert!(report.valid);
    assert_eq!(report.certificate.readable_code, "CERT-SCENARIO");
}

#[tokio::test]
async fn any_signed_field_edit_is_detected() {
    let edits: [(&str, fn(&MemoryStore)); 5] = [
        (
            "student name",
            |store: &MemoryStore| {
                store.insert_profile(Profile {
                    first_name: "ANNA".into(),
                    ..student()
                })
            },
        ),
        (
            "student email",
            |store: &MemoryStore| {
                store.insert_profile(Profile {
                    email: "b@x.com".into(),
                    ..student()
                })
            },
        ),
        (
            "course title",
            |store: &MemoryStore| {
                store.insert_course(Course {
                    title: "Intro to Y".into(),
                    ..course()
                })
            },
        ),
        (
            "skills order",
            |store: &MemoryStore| {
                store.insert_course(Course {
                    skills: Some(vec!["B".into(), "A".into()]),
                    ..course()
                })
            },
        ),
        (
            "skills removed",
            |store: &MemoryStore| {
                store.insert_course(Course {
                    skills: None,
                    ..course()
                })
            },
        ),
    ];

    for (label, edit) in edits {
        let (store, id) = scenario_store().await;
        edit(&store);
        let verifier = Verifier::new(&config(), Arc::new(store)).unwrap();

        let report = verifier.verify_certificate(&id.to_string()).await.unwrap();
        assert_eq!(
            report.status,
            VerificationStatus::SignatureInvalid,
            "edit to {} went unnoticed",
            label
        );
    }
}

#[tokio::test]
async fn record_identity_edits_are_detected() {
    let signed_on = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let cases = [
        ("issue date", "s1", "c1", NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()),
        ("student id", "s2", "c1", signed_on),
        ("course id", "s1", "c2", signed_on),
    ];

    for (label, student_id, course_id, issued_date) in cases {
        let (store, id) = store_with_signed_record(student_id, course_id, issued_date).await;
        // Same display data under another id, so only the id itself differs.
        store.insert_profile(Profile {
            id: "s2".into(),
            ..student()
        });
        store.insert_course(Course {
            id: "c2".into(),
            ..course()
        });
        let verifier = Verifier::new(&config(), Arc::new(store)).unwrap();

        let report = verifier.verify_certificate(&id.to_string()).await.unwrap();
        assert_eq!(
            report.status,
            VerificationStatus::SignatureInvalid,
            "edit to {} went unnoticed",
            label
        );
        assert_eq!(report.reason, Some("invalid_signature"));
    }
}

#[tokio::test]
async fn professor_name_is_not_signed() {
    let (store, id) = scenario_store().await;
    store.insert_profile(Profile {
        id: "p1".into(),
        role: Role::Professor,
        first_name: "Someone".into(),
        last_name: "Else".into(),
        email: "else@x.com".into(),
    });
    let verifier = Verifier::new(&config(), Arc::new(store)).unwrap();

    assert!(verifier.verify_certificate(&id.to_string()).await.unwrap().valid);
}

#[tokio::test]
async fn issued_certificate_verifies_until_it_expires_or_is_revoked() {
    let store = seeded_store();
    let objects = MemoryObjectStore::new("https://files.example/public");
    let config = config();
    let issuer = CertificateIssuer::new(
        &config,
        Arc::new(store.clone()),
        Arc::new(objects.clone()),
        Box::new(TextRenderer::new()),
    )
    .unwrap();
    let verifier = Verifier::new(&config, Arc::new(store.clone())).unwrap();

    let issued_on = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
    let request = IssueRequest {
        student_id: "s1".into(),
        course_id: "c1".into(),
    };
    let issued = issuer.issue_at("p1", &request, issued_on).await.unwrap();
    let id = issued.cert_id.to_string();

    let document = objects
        .object(
            "PDF_CERTIFICATES",
            &format!("{}-certificado.txt", issued.readable_code),
        )
        .unwrap();
    let text = String::from_utf8(document.bytes).unwrap();
    assert!(text.contains("ANA LOPEZ"));
    assert!(text.contains(&format!("http://localhost:5173/verify?id={}", id)));

    let report = verifier.verify_at(&id, issued_on).await.unwrap();
    assert!(report.valid);
    assert_eq!(report.certificate.facts.unwrap(), issued.facts);

    // The signed issued_at is rebuilt from the stored date, not the clock.
    let months_later = issued_on + Duration::days(120) + Duration::hours(7);
    let later = verifier.verify_at(&id, months_later).await.unwrap();
    assert!(later.valid);
    assert_eq!(
        canonicalize(&later.certificate.facts.unwrap()),
        canonicalize(&issued.facts)
    );

    store.set_expiration(&issued.cert_id, NaiveDate::from_ymd_opt(2026, 3, 14));
    let boundary = Utc.with_ymd_and_hms(2026, 3, 14, 0, 0, 0).unwrap();
    assert!(verifier.verify_at(&id, boundary).await.unwrap().valid);
    let expired = verifier
        .verify_at(&id, boundary + Duration::milliseconds(1))
        .await
        .unwrap();
    assert_eq!(expired.reason, Some("expired"));

    let revoked_at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    store.revoke(&issued.cert_id, Some(revoked_at));
    let revoked = verifier
        .verify_at(&id, boundary + Duration::days(1))
        .await
        .unwrap();
    assert_eq!(
        revoked.status,
        VerificationStatus::Revoked {
            revoked_at: Some(revoked_at)
        }
    );
    assert!(revoked.message.contains("1/6/2025"));
}

#[tokio::test]
async fn failed_issuance_leaves_no_record() {
    let store = seeded_store();
    let objects = MemoryObjectStore::new("https://files.example/public");
    let issuer = CertificateIssuer::new(
        &config(),
        Arc::new(store.clone()),
        Arc::new(objects.clone()),
        Box::new(TextRenderer::new()),
    )
    .unwrap();
    let request = IssueRequest {
        student_id: "s1".into(),
        course_id: "c1".into(),
    };

    assert!(issuer.issue("s1", &request).await.is_err());
    assert!(issuer.issue("nobody", &request).await.is_err());
    assert_eq!(store.certificate_count(), 0);
    assert_eq!(objects.object_count(), 0);
}
