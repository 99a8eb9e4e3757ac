//! Capability set shared by every signing algorithm.

use crate::error::JwtResult;

/// Signing algorithm interface.
///
/// Implementations own their keys and are shared read-only across threads,
/// so they must be `Send + Sync`.
pub trait SigningAlgorithm: Send + Sync {
    /// Header `alg` value, e.g. `HS256`.
    fn name(&self) -> &'static str;

    /// Sign the exact `base64url(header).base64url(payload)` bytes.
    fn sign(&self, signing_input: &[u8]) -> JwtResult<Vec<u8>>;

    /// Check a decoded signature against the signing input.
    fn verify(&self, signing_input: &[u8], signature: &[u8]) -> JwtResult<()>;

    /// Raw signature length in bytes, or 0 when unknown.
    fn signature_size(&self) -> usize;
}
