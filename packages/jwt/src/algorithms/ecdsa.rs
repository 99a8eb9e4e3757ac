//! ECDSA-based JWT Algorithm Implementations
//!
//! ES256 (P-256), ES384 (P-384) and ES512 (P-521). Signatures are the JWS
//! fixed-width `R || S` form, each half big-endian and zero-padded to the
//! curve's byte width, not ASN.1 DER.

use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};

use crate::error::{JwtError, JwtResult, KeyKind};
use crate::hasher_pool::{DigestPool, HashFunction};
use crate::traits::SigningAlgorithm;

/// Curve-specific key pair, either half optional.
pub enum EcdsaKeys {
    /// NIST P-256 keys (ES256).
    P256 {
        /// Signing key.
        private: Option<p256::ecdsa::SigningKey>,
        /// Verification key.
        public: Option<p256::ecdsa::VerifyingKey>,
    },
    /// NIST P-384 keys (ES384).
    P384 {
        /// Signing key.
        private: Option<p384::ecdsa::SigningKey>,
        /// Verification key.
        public: Option<p384::ecdsa::VerifyingKey>,
    },
    /// NIST P-521 keys (ES512).
    P521 {
        /// Signing key.
        private: Option<p521::ecdsa::SigningKey>,
        /// Verification key.
        public: Option<p521::ecdsa::VerifyingKey>,
    },
}

/// Bytes per scalar half of an `R || S` signature, `ceil(bits / 8)`.
const fn byte_width(curve_bits: usize) -> usize {
    curve_bits.div_ceil(8)
}

impl EcdsaKeys {
    fn curve_bits(&self) -> usize {
        match self {
            EcdsaKeys::P256 { .. } => 256,
            EcdsaKeys::P384 { .. } => 384,
            EcdsaKeys::P521 { .. } => 521,
        }
    }

    fn hash_function(&self) -> HashFunction {
        match self {
            EcdsaKeys::P256 { .. } => HashFunction::Sha256,
            EcdsaKeys::P384 { .. } => HashFunction::Sha384,
            EcdsaKeys::P521 { .. } => HashFunction::Sha512,
        }
    }

    /// Fill in a missing public key from the private one.
    #[allow(clippy::clone_on_copy)]
    fn with_derived_public(self) -> Self {
        match self {
            EcdsaKeys::P256 { private, public } => EcdsaKeys::P256 {
                public: public.or_else(|| private.as_ref().map(|key| key.verifying_key().clone())),
                private,
            },
            EcdsaKeys::P384 { private, public } => EcdsaKeys::P384 {
                public: public.or_else(|| private.as_ref().map(|key| key.verifying_key().clone())),
                private,
            },
            EcdsaKeys::P521 { private, public } => EcdsaKeys::P521 {
                public: public.or_else(|| private.as_ref().map(p521::ecdsa::VerifyingKey::from)),
                private,
            },
        }
    }
}

/// ECDSA with the SHA-2 digest matched to the curve.
pub struct EcdsaSha {
    name: &'static str,
    keys: EcdsaKeys,
    pool: DigestPool,
}

impl EcdsaSha {
    pub(crate) fn new(name: &'static str, keys: EcdsaKeys) -> Self {
        let pool = DigestPool::new(keys.hash_function());
        Self {
            name,
            keys: keys.with_derived_public(),
            pool,
        }
    }

    fn missing(&self, key: KeyKind) -> JwtError {
        JwtError::missing_key(self.name, key)
    }

    fn signing_failed(&self, err: impl std::fmt::Display) -> JwtError {
        JwtError::Signing(format!("{}: {err}", self.name))
    }
}

macro_rules! sign_prehash {
    ($this:expr, $key:expr, $curve:ident, $prehash:expr) => {{
        let key = $key.as_ref().ok_or_else(|| $this.missing(KeyKind::Private))?;
        let signature: $curve::ecdsa::Signature =
            key.sign_prehash($prehash).map_err(|e| $this.signing_failed(e))?;
        Ok(signature.to_bytes().to_vec())
    }};
}

macro_rules! verify_prehash {
    ($this:expr, $key:expr, $curve:ident, $prehash:expr, $signature:expr) => {{
        let key = $key.as_ref().ok_or_else(|| $this.missing(KeyKind::Public))?;
        let signature = $curve::ecdsa::Signature::from_slice($signature)
            .map_err(|_| JwtError::verification_failed($this.name))?;
        key.verify_prehash($prehash, &signature)
            .map_err(|_| JwtError::verification_failed($this.name))
    }};
}

impl SigningAlgorithm for EcdsaSha {
    fn name(&self) -> &'static str {
        self.name
    }

    fn sign(&self, signing_input: &[u8]) -> JwtResult<Vec<u8>> {
        match &self.keys {
            EcdsaKeys::P256 { private, .. } => {
                sign_prehash!(self, private, p256, &self.pool.digest(signing_input))
            }
            EcdsaKeys::P384 { private, .. } => {
                sign_prehash!(self, private, p384, &self.pool.digest(signing_input))
            }
            EcdsaKeys::P521 { private, .. } => {
                sign_prehash!(self, private, p521, &self.pool.digest(signing_input))
            }
        }
    }

    fn verify(&self, signing_input: &[u8], signature: &[u8]) -> JwtResult<()> {
        let has_public = match &self.keys {
            EcdsaKeys::P256 { public, .. } => public.is_some(),
            EcdsaKeys::P384 { public, .. } => public.is_some(),
            EcdsaKeys::P521 { public, .. } => public.is_some(),
        };
        if !has_public {
            return Err(self.missing(KeyKind::Public));
        }
        if signature.len() != self.signature_size() {
            return Err(JwtError::verification_failed(self.name));
        }
        let prehash = self.pool.digest(signing_input);
        match &self.keys {
            EcdsaKeys::P256 { public, .. } => verify_prehash!(self, public, p256, &prehash, signature),
            EcdsaKeys::P384 { public, .. } => verify_prehash!(self, public, p384, &prehash, signature),
            EcdsaKeys::P521 { public, .. } => verify_prehash!(self, public, p521, &prehash, signature),
        }
    }

    fn signature_size(&self) -> usize {
        2 * byte_width(self.keys.curve_bits())
    }
}

impl std::fmt::Debug for EcdsaSha {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcdsaSha").field("name", &self.name).finish_non_exhaustive()
    }
}
