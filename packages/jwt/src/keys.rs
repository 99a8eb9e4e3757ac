//! Key decoding helpers.
//!
//! Thin wrappers over the `pkcs8` / `spki` decode traits implemented by the
//! `rsa`, `p256`, `p384` and `ed25519-dalek` key types, mapping failures to
//! [`JwtError::InvalidKey`].

use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};

use crate::error::{JwtError, JwtResult};

/// Decode a PKCS#8 DER private key.
pub fn private_key_from_der<K: DecodePrivateKey>(der: &[u8]) -> JwtResult<K> {
    K::from_pkcs8_der(der).map_err(|e| JwtError::InvalidKey(format!("PKCS#8 private key: {e}")))
}

/// Decode a PKCS#8 PEM (`BEGIN PRIVATE KEY`) private key.
pub fn private_key_from_pem<K: DecodePrivateKey>(pem: &str) -> JwtResult<K> {
    K::from_pkcs8_pem(pem).map_err(|e| JwtError::InvalidKey(format!("PKCS#8 private key: {e}")))
}

/// Decode an SPKI DER public key.
pub fn public_key_from_der<K: DecodePublicKey>(der: &[u8]) -> JwtResult<K> {
    K::from_public_key_der(der).map_err(|e| JwtError::InvalidKey(format!("SPKI public key: {e}")))
}

/// Decode an SPKI PEM (`BEGIN PUBLIC KEY`) public key.
pub fn public_key_from_pem<K: DecodePublicKey>(pem: &str) -> JwtResult<K> {
    K::from_public_key_pem(pem).map_err(|e| JwtError::InvalidKey(format!("SPKI public key: {e}")))
}
