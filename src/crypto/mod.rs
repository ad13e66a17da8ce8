// src/crypto/mod.rs
//! Key handling and RSA-PSS signatures for certificates.

pub mod keys;
pub mod signature;
