//! Registered claims plus caller-defined claims, flattened into one JSON
//! object on the wire.

mod builder;

pub use builder::ClaimsBuilder;

use serde::de::{self, DeserializeOwned};
use serde::ser::{self, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::audience::Audience;

/// Claim names reserved by RFC 7519 §4.1.
pub const REGISTERED_CLAIMS: [&str; 7] = ["iss", "sub", "aud", "exp", "nbf", "iat", "jti"];

/// Whether `name` is one of [`REGISTERED_CLAIMS`].
#[must_use]
pub fn is_registered(name: &str) -> bool {
    REGISTERED_CLAIMS.contains(&name)
}

/// The registered claims. Times are Unix seconds; unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardClaims {
    /// Issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Audience.
    #[serde(default, skip_serializing_if = "Audience::is_empty")]
    pub aud: Audience,
    /// Expiration time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Not-before time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Issued-at time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// JWT ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl StandardClaims {
    fn serialize_entries<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        if let Some(iss) = &self.iss {
            map.serialize_entry("iss", iss)?;
        }
        if let Some(sub) = &self.sub {
            map.serialize_entry("sub", sub)?;
        }
        if !self.aud.is_empty() {
            map.serialize_entry("aud", &self.aud)?;
        }
        if let Some(exp) = &self.exp {
            map.serialize_entry("exp", exp)?;
        }
        if let Some(nbf) = &self.nbf {
            map.serialize_entry("nbf", nbf)?;
        }
        if let Some(iat) = &self.iat {
            map.serialize_entry("iat", iat)?;
        }
        if let Some(jti) = &self.jti {
            map.serialize_entry("jti", jti)?;
        }
        Ok(())
    }
}

impl AsRef<StandardClaims> for StandardClaims {
    fn as_ref(&self) -> &StandardClaims {
        self
    }
}

/// A claims set: the registered claims and a caller-defined part `T`.
///
/// `T` must serialize to a JSON object (or `null`); its members become
/// siblings of the registered claims. A member whose name is a registered
/// claim is dropped when serializing, so custom data can never override
/// `exp`, `aud` and the rest. When decoding, registered names fill
/// [`StandardClaims`] only and `T` sees the remaining members.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Claims<T = Map<String, Value>> {
    /// Registered claims.
    pub standard: StandardClaims,
    /// Caller-defined claims.
    pub custom: T,
}

impl<T> Claims<T> {
    /// Pair registered claims with custom data.
    pub fn new(standard: StandardClaims, custom: T) -> Self {
        Self { standard, custom }
    }
}

impl Claims {
    /// Start building a claims set with an open custom map.
    #[must_use]
    pub fn builder() -> ClaimsBuilder {
        ClaimsBuilder::new()
    }

    /// Set one custom claim, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.custom.insert(name.into(), value.into())
    }

    /// Copy every member of `fields` into the custom claims, replacing
    /// existing members of the same name.
    pub fn merge(&mut self, fields: Map<String, Value>) {
        self.custom.extend(fields);
    }

    /// Look up a custom claim.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.custom.get(name)
    }
}

impl<T> AsRef<StandardClaims> for Claims<T> {
    fn as_ref(&self) -> &StandardClaims {
        &self.standard
    }
}

impl<T: Serialize> Serialize for Claims<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let custom = match serde_json::to_value(&self.custom).map_err(<S::Error as ser::Error>::custom)? {
            Value::Object(fields) => fields,
            Value::Null => Map::new(),
            _ => {
                return Err(ser::Error::custom(
                    "custom claims must serialize to a JSON object",
                ))
            }
        };
        let mut map = serializer.serialize_map(None)?;
        self.standard.serialize_entries(&mut map)?;
        for (name, value) in &custom {
            if is_registered(name) {
                tracing::debug!(claim = %name, "dropping custom claim that shadows a registered claim");
                continue;
            }
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Claims<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut custom = Map::<String, Value>::deserialize(deserializer)?;
        let mut registered = Map::new();
        for name in REGISTERED_CLAIMS {
            if let Some(value) = custom.remove(name) {
                registered.insert(name.to_owned(), value);
            }
        }
        let standard = serde_json::from_value(Value::Object(registered))
            .map_err(<D::Error as de::Error>::custom)?;
        let custom =
            serde_json::from_value(Value::Object(custom)).map_err(<D::Error as de::Error>::custom)?;
        Ok(Self { standard, custom })
    }
}
