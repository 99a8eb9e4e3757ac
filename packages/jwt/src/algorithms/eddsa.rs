//! EdDSA over Ed25519.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};

use crate::error::{JwtError, JwtResult, KeyKind};
use crate::traits::SigningAlgorithm;

/// Ed25519 keys. The curve fixes the hash (SHA-512), so nothing is pooled.
pub struct Ed25519 {
    private_key: Option<SigningKey>,
    public_key: Option<VerifyingKey>,
}

impl Ed25519 {
    pub(crate) const NAME: &'static str = "Ed25519";

    pub(crate) fn new(private_key: Option<SigningKey>, public_key: Option<VerifyingKey>) -> Self {
        let public_key = public_key.or_else(|| private_key.as_ref().map(SigningKey::verifying_key));
        Self {
            private_key,
            public_key,
        }
    }
}

impl SigningAlgorithm for Ed25519 {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn sign(&self, signing_input: &[u8]) -> JwtResult<Vec<u8>> {
        let key = self
            .private_key
            .as_ref()
            .ok_or_else(|| JwtError::missing_key(Self::NAME, KeyKind::Private))?;
        Ok(key.sign(signing_input).to_bytes().to_vec())
    }

    fn verify(&self, signing_input: &[u8], signature: &[u8]) -> JwtResult<()> {
        let key = self
            .public_key
            .as_ref()
            .ok_or_else(|| JwtError::missing_key(Self::NAME, KeyKind::Public))?;
        let signature = Signature::from_slice(signature)
            .map_err(|_| JwtError::verification_failed(Self::NAME))?;
        key.verify_strict(signing_input, &signature)
            .map_err(|_| JwtError::verification_failed(Self::NAME))
    }

    fn signature_size(&self) -> usize {
        Signature::BYTE_SIZE
    }
}

impl std::fmt::Debug for Ed25519 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519")
            .field("has_private_key", &self.private_key.is_some())
            .field("has_public_key", &self.public_key.is_some())
            .finish()
    }
}
