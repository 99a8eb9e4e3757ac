//! JOSE header.

use serde::{Deserialize, Serialize};

/// `typ` value stamped on every signed token.
pub const TOKEN_TYPE: &str = "JWT";

/// JOSE header. Serialized in `alg, kid, typ, cty` order; empty optional
/// fields are omitted.
///
/// `alg` and `typ` are overwritten by [`sign`](crate::sign), so callers only
/// set `kid` and `cty`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Algorithm name.
    #[serde(default)]
    pub alg: String,
    /// Key identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Token type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    /// Content type of a nested token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cty: Option<String>,
}

impl Header {
    /// Header carrying a key identifier.
    #[must_use]
    pub fn with_kid(kid: impl Into<String>) -> Self {
        Self {
            kid: Some(kid.into()),
            ..Self::default()
        }
    }
}
