// src/storage/mod.rs
//! Storage collaborators.
//!
//! The services only need keyed lookups, a single insert per issued
//! certificate and an upload for the rendered document. Both traits are
//! implemented in memory here; a database or object-storage backend plugs in
//! by implementing the same traits.

use std::future::Future;

use uuid::Uuid;

use crate::error::StoreError;
use crate::models::certificate::CertificateRecord;
use crate::models::profile::{Course, Enrollment, Profile};

pub mod memory;
pub mod object_store;

pub use memory::{MemoryStore, Seed};
pub use object_store::MemoryObjectStore;

/// Rows the issuance and verification services read or write.
pub trait CertificateStore: Send + Sync + 'static {
    fn profile(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Profile>, StoreError>> + Send;

    fn course(&self, id: &str) -> impl Future<Output = Result<Option<Course>, StoreError>> + Send;

    fn enrollment(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> impl Future<Output = Result<Option<Enrollment>, StoreError>> + Send;

    fn certificate(
        &self,
        id: &Uuid,
    ) -> impl Future<Output = Result<Option<CertificateRecord>, StoreError>> + Send;

    /// Inserts a new row. Must fail rather than overwrite an existing id.
    fn insert_certificate(
        &self,
        record: CertificateRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Blob storage for rendered certificate documents.
pub trait ObjectStore: Send + Sync + 'static {
    /// Stores `bytes` under `bucket/name`. Must fail rather than overwrite.
    fn upload(
        &self,
        bucket: &str,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Public URL where `bucket/name` can be downloaded.
    fn public_url(&self, bucket: &str, name: &str) -> String;
}
