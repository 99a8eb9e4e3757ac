//! Token assembly.

use serde::Serialize;

use crate::algorithms::Algorithm;
use crate::encoding::{encode_into, encoded_len};
use crate::error::{JwtError, JwtResult, Segment};
use crate::header::{Header, TOKEN_TYPE};
use crate::traits::SigningAlgorithm;

/// Sign `payload` and return the compact `header.payload.signature` token.
///
/// The header's `alg` and `typ` are overwritten with the algorithm name and
/// `"JWT"`. The bytes handed to the algorithm are exactly the first two
/// encoded segments joined by `.`, as they appear in the returned token.
pub fn sign<P>(alg: &Algorithm, mut header: Header, payload: &P) -> JwtResult<String>
where
    P: Serialize + ?Sized,
{
    header.alg = alg.name().to_owned();
    header.typ = Some(TOKEN_TYPE.to_owned());

    let header_json =
        serde_json::to_vec(&header).map_err(|e| JwtError::serialization(Segment::Header, &e))?;
    let payload_json =
        serde_json::to_vec(payload).map_err(|e| JwtError::serialization(Segment::Payload, &e))?;

    let capacity = encoded_len(header_json.len())
        + encoded_len(payload_json.len())
        + encoded_len(alg.signature_size())
        + 2;
    let mut token = String::with_capacity(capacity);
    encode_into(&header_json, &mut token);
    token.push('.');
    encode_into(&payload_json, &mut token);

    let signature = alg.sign(token.as_bytes())?;
    token.push('.');
    encode_into(&signature, &mut token);
    Ok(token)
}
