// src/utils/mod.rs
//! Helper functions shared across services.

pub mod serialization;
