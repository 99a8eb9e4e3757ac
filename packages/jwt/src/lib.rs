//! JSON Web Token (JWT) codec.
//!
//! Signs and verifies compact JWS tokens (`header.payload.signature`) with:
//! - HS256/384/512, RS256/384/512, PS256/384/512, ES256/384/512, Ed25519 and `none`
//! - pooled hash states for the HMAC, RSA and ECDSA families
//! - a flattened claims container with a polymorphic `aud`
//! - composable claim validators and a `jti` replay cache
//!
//! ```
//! use jwt_codec::{decode, sign, validators, Algorithm, Claims, Header};
//!
//! let alg = Algorithm::hs256("your-256-bit-secret")?;
//! let claims = Claims::builder().subject("1234567890").claim("name", "John Doe").build();
//! let token = sign(&alg, Header::default(), &claims)?;
//!
//! let subject = validators::subject("1234567890");
//! let decoded: Claims = decode(&token, &alg, &[&subject])?;
//! assert_eq!(decoded, claims);
//! # Ok::<(), jwt_codec::JwtError>(())
//! ```
//!
//! Verification always checks that the header `alg` names the verifying
//! algorithm before looking at the signature.

pub mod algorithms;
mod audience;
mod bearer;
pub mod claims;
mod encoding;
mod error;
pub mod hasher_pool;
mod header;
pub mod keys;
mod options;
mod raw;
pub mod replay;
mod sign;
mod traits;
mod validation;
pub mod validators;

pub use algorithms::Algorithm;
pub use audience::Audience;
pub use bearer::bearer_token;
pub use claims::{Claims, ClaimsBuilder, StandardClaims};
pub use error::*;
pub use header::{Header, TOKEN_TYPE};
pub use options::{ParseOptions, DEFAULT_MAX_TOKEN_LEN};
pub use raw::{decode, parse, parse_with, verify_and_decode, RawToken, VerifiedToken};
pub use replay::ReplayCache;
pub use sign::sign;
pub use traits::SigningAlgorithm;
pub use validation::ValidationOptions;
pub use validators::Validator;
