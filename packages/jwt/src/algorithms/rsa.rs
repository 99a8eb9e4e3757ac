//! RSA-based JWT Algorithm Implementations
//!
//! RSASSA-PKCS1-v1_5 (RS256, RS384, RS512) and RSASSA-PSS (PS256, PS384,
//! PS512). The signing input is hashed with a pooled digest and the padding
//! scheme is applied to the prehash.

use rand_core::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Sign, Pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Sha256, Sha384, Sha512};

use crate::error::{JwtError, JwtResult, KeyKind};
use crate::hasher_pool::{DigestPool, HashFunction};
use crate::traits::SigningAlgorithm;

/// Signature padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsaPadding {
    /// RSASSA-PKCS1-v1_5 (`RS*`).
    Pkcs1v15,
    /// RSASSA-PSS with salt length equal to the digest length (`PS*`).
    Pss,
}

/// RSA keys with a fixed padding and hash.
pub struct RsaSha {
    name: &'static str,
    hash: HashFunction,
    padding: RsaPadding,
    private_key: Option<RsaPrivateKey>,
    public_key: Option<RsaPublicKey>,
    pool: DigestPool,
}

impl RsaSha {
    pub(crate) fn new(
        name: &'static str,
        hash: HashFunction,
        padding: RsaPadding,
        private_key: Option<RsaPrivateKey>,
        public_key: Option<RsaPublicKey>,
    ) -> Self {
        let public_key = public_key.or_else(|| private_key.as_ref().map(RsaPrivateKey::to_public_key));
        Self {
            name,
            hash,
            padding,
            private_key,
            public_key,
            pool: DigestPool::new(hash),
        }
    }

    /// Padding scheme in use.
    #[must_use]
    pub fn padding(&self) -> RsaPadding {
        self.padding
    }

    fn pkcs1v15(&self) -> Pkcs1v15Sign {
        match self.hash {
            HashFunction::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
            HashFunction::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
            HashFunction::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
        }
    }

    fn pss(&self) -> Pss {
        match self.hash {
            HashFunction::Sha256 => Pss::new::<Sha256>(),
            HashFunction::Sha384 => Pss::new::<Sha384>(),
            HashFunction::Sha512 => Pss::new::<Sha512>(),
        }
    }
}

impl SigningAlgorithm for RsaSha {
    fn name(&self) -> &'static str {
        self.name
    }

    fn sign(&self, signing_input: &[u8]) -> JwtResult<Vec<u8>> {
        let key = self
            .private_key
            .as_ref()
            .ok_or_else(|| JwtError::missing_key(self.name, KeyKind::Private))?;
        let hashed = self.pool.digest(signing_input);
        let signed = match self.padding {
            RsaPadding::Pkcs1v15 => key.sign(self.pkcs1v15(), &hashed),
            RsaPadding::Pss => key.sign_with_rng(&mut OsRng, self.pss(), &hashed),
        };
        signed.map_err(|e| JwtError::Signing(format!("{}: {e}", self.name)))
    }

    fn verify(&self, signing_input: &[u8], signature: &[u8]) -> JwtResult<()> {
        let key = self
            .public_key
            .as_ref()
            .ok_or_else(|| JwtError::missing_key(self.name, KeyKind::Public))?;
        let hashed = self.pool.digest(signing_input);
        let verified = match self.padding {
            RsaPadding::Pkcs1v15 => key.verify(self.pkcs1v15(), &hashed, signature),
            RsaPadding::Pss => key.verify(self.pss(), &hashed, signature),
        };
        verified.map_err(|_| JwtError::verification_failed(self.name))
    }

    fn signature_size(&self) -> usize {
        match (&self.public_key, &self.private_key) {
            (Some(public), _) => public.size(),
            (None, Some(private)) => private.size(),
            (None, None) => 0,
        }
    }
}

impl std::fmt::Debug for RsaSha {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaSha")
            .field("name", &self.name)
            .field("padding", &self.padding)
            .field("has_private_key", &self.private_key.is_some())
            .field("has_public_key", &self.public_key.is_some())
            .finish()
    }
}
