//! The unsecured `none` algorithm.

use crate::error::{JwtError, JwtResult};
use crate::traits::SigningAlgorithm;

/// Produces and accepts only an empty signature.
///
/// Tokens reach this verifier only when their header declares `alg: "none"`;
/// the parse pipeline rejects every other declaration before calling it, and
/// keyed verifiers reject `none` the same way.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unsecured;

impl Unsecured {
    pub(crate) const NAME: &'static str = "none";
}

impl SigningAlgorithm for Unsecured {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn sign(&self, _signing_input: &[u8]) -> JwtResult<Vec<u8>> {
        Ok(Vec::new())
    }

    fn verify(&self, _signing_input: &[u8], signature: &[u8]) -> JwtResult<()> {
        if signature.is_empty() {
            Ok(())
        } else {
            Err(JwtError::verification_failed(Self::NAME))
        }
    }

    fn signature_size(&self) -> usize {
        0
    }
}
