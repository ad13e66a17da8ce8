// src/models/mod.rs
//! Data structures shared by the issuance and verification services.

pub mod certificate;
pub mod profile;
pub mod verification;
