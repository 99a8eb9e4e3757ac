//! Split, verify and decode.
//!
//! [`RawToken`] borrows the caller's buffer and records where the two
//! separators are. Nothing is copied until the header, signature or payload
//! is actually decoded. Only [`RawToken::verify`] produces a
//! [`VerifiedToken`], and only a verified token hands out its payload.

use serde::de::DeserializeOwned;

use crate::algorithms::Algorithm;
use crate::claims::StandardClaims;
use crate::encoding::decode_segment;
use crate::error::{JwtError, JwtResult, Segment};
use crate::header::Header;
use crate::options::ParseOptions;
use crate::traits::SigningAlgorithm;
use crate::validators::{validate_all, Validator};

/// A split but unverified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawToken<'a> {
    token: &'a [u8],
    header_end: usize,
    payload_end: usize,
}

/// Split a token with the default [`ParseOptions`].
pub fn parse(token: &[u8]) -> JwtResult<RawToken<'_>> {
    parse_with(token, &ParseOptions::default())
}

/// Split a token.
///
/// Fewer than two `.` separators is [`JwtError::Malformed`]. Everything after
/// the second separator is the signature segment, dots included.
pub fn parse_with<'a>(token: &'a [u8], options: &ParseOptions) -> JwtResult<RawToken<'a>> {
    if token.is_empty() {
        return Err(JwtError::Malformed("empty token"));
    }
    if token.len() > options.max_token_len {
        return Err(JwtError::TooLarge {
            len: token.len(),
            max: options.max_token_len,
        });
    }
    let mut separators = token
        .iter()
        .enumerate()
        .filter_map(|(i, &b)| (b == b'.').then_some(i));
    let header_end = separators
        .next()
        .ok_or(JwtError::Malformed("missing header separator"))?;
    let payload_end = separators
        .next()
        .ok_or(JwtError::Malformed("missing payload separator"))?;
    Ok(RawToken {
        token,
        header_end,
        payload_end,
    })
}

impl<'a> RawToken<'a> {
    /// The whole token.
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.token
    }

    /// Encoded header.
    #[must_use]
    pub fn header_segment(&self) -> &'a [u8] {
        self.token.get(..self.header_end).unwrap_or_default()
    }

    /// Encoded payload.
    #[must_use]
    pub fn payload_segment(&self) -> &'a [u8] {
        self.token
            .get(self.header_end + 1..self.payload_end)
            .unwrap_or_default()
    }

    /// Encoded signature.
    #[must_use]
    pub fn signature_segment(&self) -> &'a [u8] {
        self.token.get(self.payload_end + 1..).unwrap_or_default()
    }

    /// The signed bytes, `header.payload`.
    #[must_use]
    pub fn signing_input(&self) -> &'a [u8] {
        self.token.get(..self.payload_end).unwrap_or_default()
    }

    /// Decode the header without verifying anything, e.g. to pick a key by
    /// `kid`. Nothing in it is authenticated yet.
    pub fn header(&self) -> JwtResult<Header> {
        let json = decode_segment(self.header_segment(), Segment::Header)?;
        serde_json::from_slice(&json).map_err(|e| JwtError::json(Segment::Header, &e))
    }

    /// Check the declared algorithm and the signature.
    ///
    /// The header `alg` must equal `alg.name()` before any signature check,
    /// so a token declaring `none` never reaches a keyed verifier and a
    /// keyed token never reaches the `none` verifier.
    pub fn verify(&self, alg: &Algorithm) -> JwtResult<VerifiedToken<'a>> {
        let header = self.header()?;
        if header.alg != alg.name() {
            tracing::warn!(
                expected = alg.name(),
                found = %header.alg.escape_debug(),
                "token algorithm does not match verifier"
            );
            return Err(JwtError::AlgorithmMismatch {
                expected: alg.name(),
                found: header.alg,
            });
        }
        let signature = decode_segment(self.signature_segment(), Segment::Signature)?;
        if let Err(err) = alg.verify(self.signing_input(), &signature) {
            tracing::debug!(algorithm = alg.name(), error = %err, "signature rejected");
            return Err(err);
        }
        Ok(VerifiedToken { raw: *self, header })
    }
}

/// A token whose algorithm and signature have been checked.
#[derive(Debug, Clone)]
pub struct VerifiedToken<'a> {
    raw: RawToken<'a>,
    header: Header,
}

impl<'a> VerifiedToken<'a> {
    /// The verified header.
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The underlying split token.
    #[must_use]
    pub fn raw(&self) -> &RawToken<'a> {
        &self.raw
    }

    fn payload(&self) -> JwtResult<Vec<u8>> {
        decode_segment(self.raw.payload_segment(), Segment::Payload)
    }

    /// Decode the payload into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> JwtResult<T> {
        let json = self.payload()?;
        serde_json::from_slice(&json).map_err(|e| JwtError::json(Segment::Payload, &e))
    }

    /// Decode the payload into `T`, then run `validators` over its
    /// registered claims in order. The first failure is returned.
    pub fn decode_validated<T: DeserializeOwned>(
        &self,
        validators: &[&dyn Validator],
    ) -> JwtResult<T> {
        let json = self.payload()?;
        let value = serde_json::from_slice(&json).map_err(|e| JwtError::json(Segment::Payload, &e))?;
        if !validators.is_empty() {
            let claims: StandardClaims =
                serde_json::from_slice(&json).map_err(|e| JwtError::json(Segment::Payload, &e))?;
            validate_all(&claims, validators)?;
        }
        Ok(value)
    }
}

/// Verify an already split token and decode its payload.
pub fn verify_and_decode<T: DeserializeOwned>(
    raw: &RawToken<'_>,
    alg: &Algorithm,
    validators: &[&dyn Validator],
) -> JwtResult<T> {
    raw.verify(alg)?.decode_validated(validators)
}

/// Split, verify, decode and validate in one pass.
pub fn decode<T: DeserializeOwned>(
    token: impl AsRef<[u8]>,
    alg: &Algorithm,
    validators: &[&dyn Validator],
) -> JwtResult<T> {
    verify_and_decode(&parse(token.as_ref())?, alg, validators)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::sign;
    use serde_json::{json, Value};

    #[test]
    fn split_rule() {
        for input in ["", "a", "a.b", "abc"] {
            assert!(parse(input.as_bytes()).unwrap_err().is_malformed(), "{input:?}");
        }
        let raw = parse(b"a.b.c.d").unwrap();
        assert_eq!(raw.header_segment(), b"a");
        assert_eq!(raw.payload_segment(), b"b");
        assert_eq!(raw.signature_segment(), b"c.d");
        assert_eq!(raw.signing_input(), b"a.b");

        let raw = parse(b"..").unwrap();
        assert!(raw.header_segment().is_empty());
        assert!(raw.payload_segment().is_empty());
        assert!(raw.signature_segment().is_empty());
    }

    #[test]
    fn oversized_tokens_are_rejected_before_splitting() {
        let opts = ParseOptions::default().with_max_token_len(4);
        assert!(matches!(
            parse_with(b"a.b.c", &opts),
            Err(JwtError::TooLarge { len: 5, max: 4 })
        ));
        assert!(parse_with(b"a.b.", &opts).is_ok());
    }

    #[test]
    fn default_limit_applies_to_parse() {
        let mut token = vec![b'a'; crate::DEFAULT_MAX_TOKEN_LEN + 1];
        token[1] = b'.';
        token[3] = b'.';
        assert!(matches!(
            parse(&token),
            Err(JwtError::TooLarge {
                len,
                max: crate::DEFAULT_MAX_TOKEN_LEN,
            }) if len == crate::DEFAULT_MAX_TOKEN_LEN + 1
        ));
        token.pop();
        assert!(parse(&token).is_ok());
    }

    #[test]
    fn mismatch_is_reported_even_when_signature_would_pass() {
        let hs256 = Algorithm::hs256("shared").unwrap();
        let hs384 = Algorithm::hs384("shared").unwrap();
        let token = sign(&hs256, Header::default(), &json!({})).unwrap();
        let raw = parse(token.as_bytes()).unwrap();
        assert!(matches!(
            raw.verify(&hs384),
            Err(JwtError::AlgorithmMismatch {
                expected: "HS384",
                ref found,
            }) if found == "HS256"
        ));
    }

    #[test]
    fn decode_errors_name_the_segment() {
        let alg = Algorithm::none();
        let header = "eyJhbGciOiJub25lIn0"; // {"alg":"none"}
        let bad_b64 = format!("{header}.!!.");
        let err = parse(bad_b64.as_bytes()).unwrap().verify(&alg).unwrap().decode::<Value>();
        assert!(matches!(
            err,
            Err(JwtError::Base64 {
                segment: Segment::Payload,
                ..
            })
        ));

        let object = format!("{header}.e30K.");
        let verified = parse(object.as_bytes()).unwrap();
        let verified = verified.verify(&alg).unwrap();
        assert!(verified.decode::<Value>().is_ok());
        assert!(matches!(
            verified.decode::<Vec<u8>>(),
            Err(JwtError::Json {
                segment: Segment::Payload,
                ..
            })
        ));

        let bad_header = parse(b"e30.e30.").unwrap();
        assert!(matches!(
            bad_header.verify(&alg),
            Err(JwtError::AlgorithmMismatch { .. })
        ));
        let not_json = parse(b"bm90.e30.").unwrap();
        assert!(matches!(
            not_json.header(),
            Err(JwtError::Json {
                segment: Segment::Header,
                ..
            })
        ));
    }

    #[test]
    fn validators_run_only_after_decoding() {
        let alg = Algorithm::hs256("k").unwrap();
        let token = sign(&alg, Header::default(), &json!({"iss": "a", "exp": 1})).unwrap();
        let iss = crate::validators::issuer("b");
        let err = decode::<Value>(&token, &alg, &[&iss]).unwrap_err();
        assert_eq!(err.claim(), Some(crate::ClaimError::Issuer));
        let value: Value = decode(&token, &alg, &[]).unwrap();
        assert_eq!(value["iss"], "a");
    }
}
