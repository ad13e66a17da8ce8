// src/storage/memory.rs
//! In-memory certificate store.
//!
//! Keeps profiles, courses, enrollments and certificates in hash maps behind a
//! shared lock. Clones share the same tables. Can be seeded from a JSON file so
//! the binary runs without a database.

use std::collections::HashMap;
use std::future::{ready, Future};
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::certificate::CertificateRecord;
use crate::models::profile::{Course, Enrollment, Profile};
use crate::storage::CertificateStore;

/// Initial contents of a [`MemoryStore`].
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct Seed {
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub enrollments: Vec<Enrollment>,
    #[serde(default)]
    pub certificates: Vec<CertificateRecord>,
}

#[derive(Default)]
struct Tables {
    profiles: HashMap<String, Profile>,
    courses: HashMap<String, Course>,
    enrollments: HashMap<(String, String), Enrollment>,
    certificates: HashMap<Uuid, CertificateRecord>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: Seed) -> Self {
        let store = Self::new();
        for profile in seed.profiles {
            store.insert_profile(profile);
        }
        for course in seed.courses {
            store.insert_course(course);
        }
        for enrollment in seed.enrollments {
            store.insert_enrollment(enrollment);
        }
        {
            let mut tables = store.write();
            for record in seed.certificates {
                tables.certificates.insert(record.id, record);
            }
        }
        store
    }

    /// Loads a [`Seed`] from a JSON file.
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Backend(format!("{}: {}", path.display(), e)))?;
        let seed: Seed = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Backend(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_seed(seed))
    }

    // A poisoned lock only means a writer panicked; the maps stay consistent.
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|poison| poison.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|poison| poison.into_inner())
    }

    pub fn insert_profile(&self, profile: Profile) {
        self.write().profiles.insert(profile.id.clone(), profile);
    }

    pub fn remove_profile(&self, id: &str) -> bool {
        self.write().profiles.remove(id).is_some()
    }

    pub fn insert_course(&self, course: Course) {
        self.write().courses.insert(course.id.clone(), course);
    }

    pub fn remove_course(&self, id: &str) -> bool {
        self.write().courses.remove(id).is_some()
    }

    pub fn insert_enrollment(&self, enrollment: Enrollment) {
        let key = (enrollment.student_id.clone(), enrollment.course_id.clone());
        self.write().enrollments.insert(key, enrollment);
    }

    pub fn certificate_count(&self) -> usize {
        self.read().certificates.len()
    }

    /// Administrative revocation. Returns `false` when the id is unknown.
    pub fn revoke(&self, id: &Uuid, at: Option<DateTime<Utc>>) -> bool {
        match self.write().certificates.get_mut(id) {
            Some(record) => {
                record.revoked = true;
                record.revoked_at = at;
                true
            }
            None => false,
        }
    }

    /// Administrative expiration. Returns `false` when the id is unknown.
    pub fn set_expiration(&self, id: &Uuid, date: Option<NaiveDate>) -> bool {
        match self.write().certificates.get_mut(id) {
            Some(record) => {
                record.expiration_date = date;
                true
            }
            None => false,
        }
    }

    /// Overwrites the stored signature. Only useful to simulate tampering.
    pub fn replace_signature(&self, id: &Uuid, signature: &str) -> bool {
        match self.write().certificates.get_mut(id) {
            Some(record) => {
                record.digital_signature = signature.to_string();
                true
            }
            None => false,
        }
    }
}

impl CertificateStore for MemoryStore {
    fn profile(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Profile>, StoreError>> + Send {
        ready(Ok(self.read().profiles.get(id).cloned()))
    }

    fn course(&self, id: &str) -> impl Future<Output = Result<Option<Course>, StoreError>> + Send {
        ready(Ok(self.read().courses.get(id).cloned()))
    }

    fn enrollment(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> impl Future<Output = Result<Option<Enrollment>, StoreError>> + Send {
        let key = (student_id.to_string(), course_id.to_string());
        ready(Ok(self.read().enrollments.get(&key).cloned()))
    }

    fn certificate(
        &self,
        id: &Uuid,
    ) -> impl Future<Output = Result<Option<CertificateRecord>, StoreError>> + Send {
        ready(Ok(self.read().certificates.get(id).cloned()))
    }

    fn insert_certificate(
        &self,
        record: CertificateRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        let mut tables = self.write();
        let result = if tables.certificates.contains_key(&record.id) {
            Err(StoreError::Duplicate(record.id.to_string()))
        } else {
            tables.certificates.insert(record.id, record);
            Ok(())
        };
        ready(result)
    }
}
