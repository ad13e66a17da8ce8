// src/crypto/keys.rs
//! Key material loading.
//!
//! Keys arrive as PEM text from configuration: PKCS#8 for the private key used
//! at issuance and SPKI for the public key used at verification. Decoding strips
//! the armor boundaries and whitespace, then base64-decodes the body.

use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::error::KeyError;

const BOUNDARY: &str = "-----";

/// Returns the DER bytes carried by a PEM document.
///
/// Accepts multi-line PEM, single-line PEM (as often found in environment
/// variables) and bodies whose line breaks were written as literal `\n`.
pub fn decode_pem(pem: &str) -> Result<Vec<u8>, KeyError> {
    let mut body = String::with_capacity(pem.len());
    let mut rest = pem;

    while let Some(start) = rest.find(BOUNDARY) {
        body.push_str(&rest[..start]);
        let label = &rest[start + BOUNDARY.len()..];
        let end = label
            .find(BOUNDARY)
            .ok_or_else(|| KeyError::Armor("unterminated PEM boundary".to_string()))?;
        rest = &label[end + BOUNDARY.len()..];
    }
    body.push_str(rest);

    let body = body.replace("\\n", "");
    let body: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    if body.is_empty() {
        return Err(KeyError::Armor("empty PEM body".to_string()));
    }

    base64::decode(&body).map_err(|e| KeyError::Armor(e.to_string()))
}

/// Imports a PEM PKCS#8 RSA private key.
pub fn load_signing_key(pem: &str) -> Result<RsaPrivateKey, KeyError> {
    let der = decode_pem(pem)?;
    RsaPrivateKey::from_pkcs8_der(&der).map_err(|e| KeyError::Import(e.to_string()))
}

/// Imports a PEM SPKI RSA public key.
pub fn load_verifying_key(pem: &str) -> Result<RsaPublicKey, KeyError> {
    let der = decode_pem(pem)?;
    RsaPublicKey::from_public_key_der(&der).map_err(|e| KeyError::Import(e.to_string()))
}
