//! Bundled claim validation options.

use chrono::{DateTime, Duration, Utc};

use crate::audience::Audience;
use crate::claims::StandardClaims;
use crate::error::ClaimError;
use crate::validators::{
    check_audience, check_expiration, check_issued_at, check_not_before, Validator,
};

/// Claim validation options.
///
/// Runs the time checks first (`exp`, `nbf`, `iat`), then the expected
/// values (`iss`, `sub`, `aud`, `jti`), reporting the first failure. It is a
/// [`Validator`] itself, so it can be mixed with other validators.
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Leeway for time-based claims.
    pub leeway: Duration,
    /// Validate expiry.
    pub validate_exp: bool,
    /// Treat a missing `exp` as expired.
    pub require_exp: bool,
    /// Validate not-before.
    pub validate_nbf: bool,
    /// Validate issued-at.
    pub validate_iat: bool,
    /// Expected issuer.
    pub expected_issuer: Option<String>,
    /// Expected subject.
    pub expected_subject: Option<String>,
    /// Expected audience; any overlap passes.
    pub expected_audience: Option<Audience>,
    /// Expected JWT ID.
    pub expected_id: Option<String>,
    /// Evaluate against this instant instead of the system clock.
    pub now: Option<DateTime<Utc>>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            leeway: Duration::zero(),
            validate_exp: true,
            require_exp: false,
            validate_nbf: true,
            validate_iat: true,
            expected_issuer: None,
            expected_subject: None,
            expected_audience: None,
            expected_id: None,
            now: None,
        }
    }
}

impl ValidationOptions {
    /// Default checks: `exp`, `nbf` and `iat` with no leeway, absent `exp`
    /// allowed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default checks, plus a mandatory `exp`.
    #[must_use]
    pub fn strict() -> Self {
        Self::default().require_expiration(true)
    }

    /// Set the time leeway for validation.
    #[must_use]
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Set whether to validate expiration.
    #[must_use]
    pub fn validate_expiration(mut self, validate: bool) -> Self {
        self.validate_exp = validate;
        self
    }

    /// Set whether a missing `exp` counts as expired.
    #[must_use]
    pub fn require_expiration(mut self, require: bool) -> Self {
        self.require_exp = require;
        self
    }

    /// Set whether to validate not-before.
    #[must_use]
    pub fn validate_not_before(mut self, validate: bool) -> Self {
        self.validate_nbf = validate;
        self
    }

    /// Set whether to validate issued-at.
    #[must_use]
    pub fn validate_issued_at(mut self, validate: bool) -> Self {
        self.validate_iat = validate;
        self
    }

    /// Set expected issuer.
    #[must_use]
    pub fn expect_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.expected_issuer = Some(issuer.into());
        self
    }

    /// Set expected subject.
    #[must_use]
    pub fn expect_subject(mut self, subject: impl Into<String>) -> Self {
        self.expected_subject = Some(subject.into());
        self
    }

    /// Set expected audience.
    #[must_use]
    pub fn expect_audience(mut self, audience: impl Into<Audience>) -> Self {
        self.expected_audience = Some(audience.into());
        self
    }

    /// Set expected JWT ID.
    #[must_use]
    pub fn expect_id(mut self, id: impl Into<String>) -> Self {
        self.expected_id = Some(id.into());
        self
    }

    /// Pin the validation clock.
    #[must_use]
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }
}

fn check_expected(actual: Option<&str>, expected: Option<&String>, err: ClaimError) -> Result<(), ClaimError> {
    match expected {
        Some(expected) if actual != Some(expected.as_str()) => Err(err),
        _ => Ok(()),
    }
}

impl Validator for ValidationOptions {
    fn validate(&self, claims: &StandardClaims) -> Result<(), ClaimError> {
        let now = self.now.unwrap_or_else(Utc::now).timestamp();
        let leeway = self.leeway.num_seconds().max(0);

        if self.validate_exp {
            check_expiration(claims.exp, now, leeway, self.require_exp)?;
        }
        if self.validate_nbf {
            check_not_before(claims.nbf, now, leeway)?;
        }
        if self.validate_iat {
            check_issued_at(claims.iat, now, leeway)?;
        }
        check_expected(claims.iss.as_deref(), self.expected_issuer.as_ref(), ClaimError::Issuer)?;
        check_expected(claims.sub.as_deref(), self.expected_subject.as_ref(), ClaimError::Subject)?;
        if let Some(audience) = &self.expected_audience {
            check_audience(&claims.aud, audience)?;
        }
        check_expected(claims.jti.as_deref(), self.expected_id.as_ref(), ClaimError::Id)
    }
}
