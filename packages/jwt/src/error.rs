//! Error types for the token codec.
//!
//! Every stage of the sign and parse pipelines reports a distinct kind so that
//! callers can tell a malformed token from a forged one from an expired one.

use std::fmt;
use thiserror::Error;

/// JWT operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// One of the three dot-separated parts of a compact token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// JOSE header.
    Header,
    /// Claims set.
    Payload,
    /// Signature bytes.
    Signature,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Segment::Header => "header",
            Segment::Payload => "payload",
            Segment::Signature => "signature",
        })
    }
}

/// Which half of an asymmetric key pair an operation needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Signing key.
    Private,
    /// Verification key.
    Public,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyKind::Private => "private",
            KeyKind::Public => "public",
        })
    }
}

/// A failed claim check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClaimError {
    /// No overlap between the token audience and the expected audience.
    #[error("aud claim is invalid")]
    Audience,
    /// The `exp` claim is in the past, or absent under a strict policy.
    #[error("token has expired")]
    Expired,
    /// The `nbf` claim is in the future.
    #[error("token is not valid yet")]
    NotYetValid,
    /// The `iat` claim is in the future.
    #[error("token was issued in the future")]
    IssuedInFuture,
    /// The `iss` claim did not match.
    #[error("iss claim is invalid")]
    Issuer,
    /// The `sub` claim did not match.
    #[error("sub claim is invalid")]
    Subject,
    /// The `jti` claim did not match.
    #[error("jti claim is invalid")]
    Id,
    /// A `jti` claim was required but absent.
    #[error("jti claim is required")]
    MissingId,
    /// The `jti` claim has been presented more often than allowed.
    #[error("jti claim has exceeded its allowed uses")]
    IdReplayed,
}

/// JWT error types
#[derive(Debug, Error)]
pub enum JwtError {
    /// The token does not contain two `.` separators.
    #[error("malformed token: {0}")]
    Malformed(&'static str),

    /// The token is longer than the configured upper bound.
    #[error("token is {len} bytes, limit is {max}")]
    TooLarge {
        /// Actual length.
        len: usize,
        /// Configured limit.
        max: usize,
    },

    /// A segment is not valid unpadded base64url.
    #[error("invalid base64url in token {segment}")]
    Base64 {
        /// Segment that failed to decode.
        segment: Segment,
        /// Underlying decoder error.
        #[source]
        source: base64::DecodeError,
    },

    /// A segment decoded to bytes that are not the expected JSON shape.
    #[error("invalid JSON in token {segment}: {message}")]
    Json {
        /// Segment that failed to parse.
        segment: Segment,
        /// Parser message.
        message: String,
    },

    /// Header or payload could not be serialized while signing.
    #[error("failed to serialize token {segment}: {message}")]
    Serialization {
        /// Segment being produced.
        segment: Segment,
        /// Serializer message.
        message: String,
    },

    /// The header `alg` does not name the verifying algorithm.
    #[error("algorithm mismatch: expected {expected}, token declares {found:?}")]
    AlgorithmMismatch {
        /// Name of the verifying algorithm.
        expected: &'static str,
        /// Value of the header `alg` field.
        found: String,
    },

    /// The signature did not validate.
    #[error("{algorithm} signature verification failed")]
    VerificationFailed {
        /// Name of the verifying algorithm.
        algorithm: &'static str,
    },

    /// A sign or verify operation needed a key that was not configured.
    #[error("{algorithm} {key} key is nil")]
    MissingKey {
        /// Algorithm name.
        algorithm: &'static str,
        /// Which key was missing.
        key: KeyKind,
    },

    /// An HMAC algorithm was used with an empty secret.
    #[error("{algorithm} secret is empty")]
    EmptyKey {
        /// Algorithm name.
        algorithm: &'static str,
    },

    /// Key material could not be decoded or used.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The underlying signature primitive failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// An `Authorization` value is not of the form `Bearer <token>`.
    #[error("malformed Authorization header")]
    MalformedAuthorization,

    /// A claim validator rejected the token.
    #[error(transparent)]
    Claim(#[from] ClaimError),
}

impl JwtError {
    /// Create a JSON error for the given segment
    #[inline]
    pub(crate) fn json(segment: Segment, err: &serde_json::Error) -> Self {
        JwtError::Json {
            segment,
            message: err.to_string(),
        }
    }

    /// Create a serialization error for the given segment
    #[inline]
    pub(crate) fn serialization(segment: Segment, err: &serde_json::Error) -> Self {
        JwtError::Serialization {
            segment,
            message: err.to_string(),
        }
    }

    #[inline]
    pub(crate) fn missing_key(algorithm: &'static str, key: KeyKind) -> Self {
        JwtError::MissingKey { algorithm, key }
    }

    #[inline]
    pub(crate) fn verification_failed(algorithm: &'static str) -> Self {
        JwtError::VerificationFailed { algorithm }
    }

    /// Create an invalid key error
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: &str) -> Self {
        JwtError::InvalidKey(msg.to_string())
    }

    /// Claim-specific cause, if this is a validation failure.
    #[must_use]
    pub fn claim(&self) -> Option<ClaimError> {
        match self {
            JwtError::Claim(claim) => Some(*claim),
            _ => None,
        }
    }

    /// Whether the token was rejected before its signature could be checked
    /// because it is not structurally a token.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            JwtError::Malformed(_)
                | JwtError::TooLarge { .. }
                | JwtError::Base64 { .. }
                | JwtError::Json { .. }
        )
    }
}
