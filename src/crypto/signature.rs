// src/crypto/signature.rs
//! RSA-PSS signing and verification of canonical certificate payloads.
//!
//! Parameters are fixed for every certificate: SHA-256 digest, MGF1 with
//! SHA-256, salt length 32 bytes. Signatures travel as standard base64.

use log::debug;
use rsa::pss::{Signature, SigningKey, VerifyingKey};
use rsa::signature::{RandomizedSigner, SignatureEncoding, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::crypto::keys::{load_signing_key, load_verifying_key};
use crate::error::{CertificateError, KeyError};

/// PSS salt length in bytes.
pub const PSS_SALT_LEN: usize = 32;

/// Signs certificate payloads with the issuer's private key.
///
/// Holds only the signing capability; the key never leaves this struct and is
/// not logged.
pub struct CertificateSigner {
    key: SigningKey<Sha256>,
}

impl CertificateSigner {
    pub fn new(private_key: RsaPrivateKey) -> Self {
        Self {
            key: SigningKey::new_with_salt_len(private_key, PSS_SALT_LEN),
        }
    }

    /// Imports a PEM PKCS#8 private key.
    pub fn from_pem(pem: &str) -> Result<Self, KeyError> {
        Ok(Self::new(load_signing_key(pem)?))
    }

    /// Raw signature bytes over `payload`.
    ///
    /// PSS is randomized, so two calls over the same payload return different
    /// signatures that both verify.
    pub fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, CertificateError> {
        let mut rng = rand::thread_rng();
        let signature = self.key.try_sign_with_rng(&mut rng, payload)?;
        Ok(signature.to_vec())
    }

    /// Base64 signature, as persisted in `CertificateRecord::digital_signature`.
    pub fn sign_base64(&self, payload: &[u8]) -> Result<String, CertificateError> {
        self.sign(payload).map(base64::encode)
    }
}

/// Checks certificate signatures with the issuer's public key.
pub struct CertificateVerifier {
    key: VerifyingKey<Sha256>,
}

impl CertificateVerifier {
    pub fn new(public_key: RsaPublicKey) -> Self {
        Self {
            key: VerifyingKey::new_with_salt_len(public_key, PSS_SALT_LEN),
        }
    }

    /// Imports a PEM SPKI public key.
    pub fn from_pem(pem: &str) -> Result<Self, KeyError> {
        Ok(Self::new(load_verifying_key(pem)?))
    }

    /// `true` when `signature` is a valid signature over `payload`.
    ///
    /// Rejection is a normal outcome and never an error.
    pub fn verify(&self, signature: &[u8], payload: &[u8]) -> bool {
        match Signature::try_from(signature) {
            Ok(signature) => self.key.verify(payload, &signature).is_ok(),
            Err(e) => {
                debug!("Malformed signature bytes: {}", e);
                false
            }
        }
    }

    /// Like [`verify`](Self::verify) for a base64 signature.
    ///
    /// A signature that is not valid base64 cannot match and yields `false`.
    pub fn verify_base64(&self, signature: &str, payload: &[u8]) -> bool {
        match base64::decode(signature.trim()) {
            Ok(bytes) => self.verify(&bytes, payload),
            Err(e) => {
                debug!("Stored signature is not base64: {}", e);
                false
            }
        }
    }
}
