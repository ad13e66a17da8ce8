// src/services/mod.rs
//! Business logic and the HTTP surface.

pub mod api_server;
pub mod certificate_issuer;
pub mod status;
pub mod verifier;
