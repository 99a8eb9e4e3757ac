//! Base64url helpers (RFC 7515 §2: URL-safe alphabet, no padding).

use crate::error::{JwtError, JwtResult, Segment};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

/// Length of the unpadded base64url encoding of `len` bytes.
///
/// Only used as an allocation hint, so overflow degrades to "no hint".
#[inline]
pub(crate) fn encoded_len(len: usize) -> usize {
    base64::encoded_len(len, false).unwrap_or(0)
}

/// Append the base64url encoding of `input` to `out`.
#[inline]
pub(crate) fn encode_into(input: &[u8], out: &mut String) {
    URL_SAFE_NO_PAD.encode_string(input, out);
}

/// Decode one token segment, tagging failures with the segment they came from.
#[inline]
pub(crate) fn decode_segment(input: &[u8], segment: Segment) -> JwtResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|source| JwtError::Base64 { segment, source })
}
