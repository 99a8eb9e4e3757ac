use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};

use super::{Claims, StandardClaims};
use crate::audience::Audience;

/// Builder for a [`Claims`] set with an open custom map.
///
/// Relative times are resolved against the clock when the setter runs.
#[derive(Debug, Clone, Default)]
pub struct ClaimsBuilder {
    standard: StandardClaims,
    custom: Map<String, Value>,
}

impl ClaimsBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the issuer (iss) claim.
    #[must_use]
    pub fn issuer(mut self, iss: impl Into<String>) -> Self {
        self.standard.iss = Some(iss.into());
        self
    }

    /// Set the subject (sub) claim.
    #[must_use]
    pub fn subject(mut self, sub: impl Into<String>) -> Self {
        self.standard.sub = Some(sub.into());
        self
    }

    /// Set the audience (aud) claim.
    #[must_use]
    pub fn audience(mut self, aud: impl Into<Audience>) -> Self {
        self.standard.aud = aud.into();
        self
    }

    /// Set the expiration time.
    #[must_use]
    pub fn expiration(mut self, exp: DateTime<Utc>) -> Self {
        self.standard.exp = Some(exp.timestamp());
        self
    }

    /// Set the expiration time relative to now.
    #[must_use]
    pub fn expires_in(self, dur: Duration) -> Self {
        self.expiration(Utc::now() + dur)
    }

    /// Set the not-before (nbf) claim.
    #[must_use]
    pub fn not_before(mut self, nbf: DateTime<Utc>) -> Self {
        self.standard.nbf = Some(nbf.timestamp());
        self
    }

    /// Set the issued-at (iat) claim.
    #[must_use]
    pub fn issued_at(mut self, iat: DateTime<Utc>) -> Self {
        self.standard.iat = Some(iat.timestamp());
        self
    }

    /// Set the issued-at time to now.
    #[must_use]
    pub fn issued_now(self) -> Self {
        self.issued_at(Utc::now())
    }

    /// Set the JWT ID (jti) claim.
    #[must_use]
    pub fn jwt_id(mut self, jti: impl Into<String>) -> Self {
        self.standard.jti = Some(jti.into());
        self
    }

    /// Add a custom claim.
    #[must_use]
    pub fn claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom.insert(name.into(), value.into());
        self
    }

    /// Build the claims.
    #[must_use]
    pub fn build(self) -> Claims {
        Claims {
            standard: self.standard,
            custom: self.custom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_times_are_anchored_to_now() {
        let before = Utc::now().timestamp();
        let claims = ClaimsBuilder::new()
            .subject("user")
            .issued_now()
            .expires_in(Duration::minutes(5))
            .claim("role", "admin")
            .build();
        let after = Utc::now().timestamp();

        let iat = claims.standard.iat.unwrap();
        let exp = claims.standard.exp.unwrap();
        assert!((before..=after).contains(&iat));
        assert!((before + 300..=after + 300).contains(&exp));
        assert_eq!(claims.get("role"), Some(&Value::from("admin")));
    }

    #[test]
    fn audience_accepts_single_or_many() {
        let one = ClaimsBuilder::new().audience("api").build();
        assert_eq!(one.standard.aud.len(), 1);
        let two = ClaimsBuilder::new().audience(["api", "web"]).build();
        assert_eq!(two.standard.aud.len(), 2);
    }
}
