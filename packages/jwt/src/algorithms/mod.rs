//! Signing algorithm families and the closed [`Algorithm`] set.
//!
//! Each constructor fixes the `alg` name, the hash and the key material.
//! Constructors that take a private key derive the public half when it is
//! omitted, so a single instance can both sign and verify.

mod ecdsa;
mod eddsa;
mod hmac;
mod none;
mod rsa;

pub use self::ecdsa::{EcdsaKeys, EcdsaSha};
pub use self::eddsa::Ed25519;
pub use self::hmac::HmacSha;
pub use self::none::Unsecured;
pub use self::rsa::{RsaPadding, RsaSha};

use ::rsa::{RsaPrivateKey, RsaPublicKey};

use crate::error::JwtResult;
use crate::hasher_pool::HashFunction;
use crate::traits::SigningAlgorithm;

/// Every supported JWS algorithm.
#[derive(Debug)]
pub enum Algorithm {
    /// HS256, HS384, HS512
    Hmac(HmacSha),
    /// RS256, RS384, RS512, PS256, PS384, PS512
    Rsa(RsaSha),
    /// ES256, ES384, ES512
    Ecdsa(EcdsaSha),
    /// Ed25519
    EdDsa(Ed25519),
    /// Unsecured tokens (`alg: "none"`).
    None(Unsecured),
}

macro_rules! hmac_constructor {
    ($(#[$doc:meta])* $fn:ident, $name:literal, $hash:ident) => {
        $(#[$doc])*
        pub fn $fn(secret: impl AsRef<[u8]>) -> JwtResult<Self> {
            HmacSha::new($name, HashFunction::$hash, secret.as_ref()).map(Algorithm::Hmac)
        }
    };
}

macro_rules! rsa_constructor {
    ($(#[$doc:meta])* $fn:ident, $name:literal, $hash:ident, $padding:ident) => {
        $(#[$doc])*
        #[must_use]
        pub fn $fn(private_key: Option<RsaPrivateKey>, public_key: Option<RsaPublicKey>) -> Self {
            Algorithm::Rsa(RsaSha::new(
                $name,
                HashFunction::$hash,
                RsaPadding::$padding,
                private_key,
                public_key,
            ))
        }
    };
}

macro_rules! ecdsa_constructor {
    ($(#[$doc:meta])* $fn:ident, $name:literal, $curve:ident, $variant:ident) => {
        $(#[$doc])*
        #[must_use]
        pub fn $fn(
            private_key: Option<$curve::ecdsa::SigningKey>,
            public_key: Option<$curve::ecdsa::VerifyingKey>,
        ) -> Self {
            Algorithm::Ecdsa(EcdsaSha::new(
                $name,
                EcdsaKeys::$variant {
                    private: private_key,
                    public: public_key,
                },
            ))
        }
    };
}

impl Algorithm {
    hmac_constructor!(
        /// HMAC-SHA256. An empty secret constructs but fails to sign or verify.
        hs256, "HS256", Sha256
    );
    hmac_constructor!(
        /// HMAC-SHA384.
        hs384, "HS384", Sha384
    );
    hmac_constructor!(
        /// HMAC-SHA512.
        hs512, "HS512", Sha512
    );

    rsa_constructor!(
        /// RSASSA-PKCS1-v1_5 with SHA-256.
        rs256, "RS256", Sha256, Pkcs1v15
    );
    rsa_constructor!(
        /// RSASSA-PKCS1-v1_5 with SHA-384.
        rs384, "RS384", Sha384, Pkcs1v15
    );
    rsa_constructor!(
        /// RSASSA-PKCS1-v1_5 with SHA-512.
        rs512, "RS512", Sha512, Pkcs1v15
    );
    rsa_constructor!(
        /// RSASSA-PSS with SHA-256.
        ps256, "PS256", Sha256, Pss
    );
    rsa_constructor!(
        /// RSASSA-PSS with SHA-384.
        ps384, "PS384", Sha384, Pss
    );
    rsa_constructor!(
        /// RSASSA-PSS with SHA-512.
        ps512, "PS512", Sha512, Pss
    );

    ecdsa_constructor!(
        /// ECDSA on P-256 with SHA-256.
        es256, "ES256", p256, P256
    );
    ecdsa_constructor!(
        /// ECDSA on P-384 with SHA-384.
        es384, "ES384", p384, P384
    );
    ecdsa_constructor!(
        /// ECDSA on P-521 with SHA-512.
        es512, "ES512", p521, P521
    );

    /// EdDSA over Ed25519.
    #[must_use]
    pub fn ed25519(
        private_key: Option<ed25519_dalek::SigningKey>,
        public_key: Option<ed25519_dalek::VerifyingKey>,
    ) -> Self {
        Algorithm::EdDsa(Ed25519::new(private_key, public_key))
    }

    /// The unsecured `none` algorithm.
    #[must_use]
    pub fn none() -> Self {
        Algorithm::None(Unsecured)
    }
}

macro_rules! dispatch {
    ($this:expr, $alg:ident => $call:expr) => {
        match $this {
            Algorithm::Hmac($alg) => $call,
            Algorithm::Rsa($alg) => $call,
            Algorithm::Ecdsa($alg) => $call,
            Algorithm::EdDsa($alg) => $call,
            Algorithm::None($alg) => $call,
        }
    };
}

impl SigningAlgorithm for Algorithm {
    fn name(&self) -> &'static str {
        dispatch!(self, alg => alg.name())
    }

    fn sign(&self, signing_input: &[u8]) -> JwtResult<Vec<u8>> {
        dispatch!(self, alg => alg.sign(signing_input))
    }

    fn verify(&self, signing_input: &[u8], signature: &[u8]) -> JwtResult<()> {
        dispatch!(self, alg => alg.verify(signing_input, signature))
    }

    fn signature_size(&self) -> usize {
        dispatch!(self, alg => alg.signature_size())
    }
}
