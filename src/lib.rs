// src/lib.rs

//! # Course Certificates
//!
//! Issues tamper-evident course-completion certificates and verifies them.
//!
//! ## Architecture Overview
//! 1. **Models**: profiles, courses, certificate facts and verification outcomes
//! 2. **Cryptography**: RSA-PSS (SHA-256) signing over a canonical JSON payload
//! 3. **Services**: issuance, verification and the HTTP API
//! 4. **Storage**: certificate rows and rendered documents behind traits
//! 5. **Rendering**: the human-readable certificate document

pub mod config;     // Environment configuration
pub mod crypto;     // Key import and signatures
pub mod error;      // Error types
pub mod models;     // Data structures
pub mod rendering;  // Certificate documents
pub mod services;   // Business logic and API
pub mod storage;    // Persistence collaborators
pub mod utils;      // Canonical serialization helpers
