//! `Authorization: Bearer` extraction.

use crate::error::{JwtError, JwtResult};

const SCHEME: &str = "Bearer";

/// Return the token from an `Authorization` header value of the form
/// `Bearer <token>`. The scheme is matched case-insensitively.
pub fn bearer_token(authorization: &str) -> JwtResult<&str> {
    let (scheme, token) = authorization
        .trim()
        .split_once(' ')
        .ok_or(JwtError::MalformedAuthorization)?;
    let token = token.trim_start();
    if !scheme.eq_ignore_ascii_case(SCHEME) || token.is_empty() || token.contains(char::is_whitespace) {
        return Err(JwtError::MalformedAuthorization);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_token() {
        assert_eq!(bearer_token("Bearer a.b.c").unwrap(), "a.b.c");
        assert_eq!(bearer_token("bearer  a.b.c ").unwrap(), "a.b.c");
    }

    #[test]
    fn rejects_other_shapes() {
        for value in ["", "Bearer", "Bearer ", "Basic dXNlcg==", "Bearer a b", "Bearera.b.c"] {
            assert!(
                matches!(bearer_token(value), Err(JwtError::MalformedAuthorization)),
                "{value:?}"
            );
        }
    }
}
