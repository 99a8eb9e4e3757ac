//! HMAC-SHA algorithms (HS256, HS384, HS512).

use subtle::ConstantTimeEq;

use crate::error::{JwtError, JwtResult};
use crate::hasher_pool::{HashFunction, MacPool};
use crate::traits::SigningAlgorithm;

/// HMAC over SHA-2 with a shared secret.
pub struct HmacSha {
    name: &'static str,
    hash: HashFunction,
    empty_key: bool,
    pool: MacPool,
}

impl HmacSha {
    pub(crate) fn new(name: &'static str, hash: HashFunction, secret: &[u8]) -> JwtResult<Self> {
        if !secret.is_empty() && secret.len() < hash.output_size() {
            tracing::warn!(
                algorithm = name,
                key_len = secret.len(),
                recommended = hash.output_size(),
                "HMAC secret is shorter than the digest output"
            );
        }
        Ok(Self {
            name,
            hash,
            empty_key: secret.is_empty(),
            pool: MacPool::new(hash, secret)?,
        })
    }

    /// Digest this algorithm uses.
    #[must_use]
    pub fn hash_function(&self) -> HashFunction {
        self.hash
    }

    fn ensure_key(&self) -> JwtResult<()> {
        if self.empty_key {
            return Err(JwtError::EmptyKey {
                algorithm: self.name,
            });
        }
        Ok(())
    }
}

impl SigningAlgorithm for HmacSha {
    fn name(&self) -> &'static str {
        self.name
    }

    fn sign(&self, signing_input: &[u8]) -> JwtResult<Vec<u8>> {
        self.ensure_key()?;
        Ok(self.pool.tag(signing_input))
    }

    fn verify(&self, signing_input: &[u8], signature: &[u8]) -> JwtResult<()> {
        self.ensure_key()?;
        let expected = self.pool.tag(signing_input);
        // Length is public (fixed per algorithm); contents are compared in constant time.
        if bool::from(expected.as_slice().ct_eq(signature)) {
            Ok(())
        } else {
            Err(JwtError::verification_failed(self.name))
        }
    }

    fn signature_size(&self) -> usize {
        self.hash.output_size()
    }
}

impl std::fmt::Debug for HmacSha {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSha").field("name", &self.name).finish_non_exhaustive()
    }
}
