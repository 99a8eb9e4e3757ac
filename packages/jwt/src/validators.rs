//! Claim validators.
//!
//! A validator is any `Fn(&StandardClaims) -> Result<(), ClaimError>` that is
//! `Send + Sync`. The constructors here close over an expected value or a
//! fixed "now"; run them through
//! [`VerifiedToken::decode_validated`](crate::VerifiedToken::decode_validated).
//!
//! Time rules, all at one-second granularity:
//! - expired when `now >= exp`
//! - not yet valid when `now < nbf`
//! - issued in the future when `now < iat`
//!
//! An absent `exp` never expires under [`expiration`] and is treated as
//! expired under [`strict_expiration`].

use chrono::{DateTime, Utc};

use crate::audience::Audience;
use crate::claims::StandardClaims;
use crate::error::ClaimError;

/// A check over the registered claims of a verified token.
pub trait Validator: Send + Sync {
    /// Accept or reject the claims.
    fn validate(&self, claims: &StandardClaims) -> Result<(), ClaimError>;
}

impl<F> Validator for F
where
    F: Fn(&StandardClaims) -> Result<(), ClaimError> + Send + Sync,
{
    fn validate(&self, claims: &StandardClaims) -> Result<(), ClaimError> {
        self(claims)
    }
}

/// Run validators in order, stopping at the first failure.
pub fn validate_all(claims: &StandardClaims, validators: &[&dyn Validator]) -> Result<(), ClaimError> {
    validators.iter().try_for_each(|v| v.validate(claims))
}

pub(crate) fn check_expiration(
    exp: Option<i64>,
    now: i64,
    leeway: i64,
    strict: bool,
) -> Result<(), ClaimError> {
    match exp {
        Some(exp) if now >= exp.saturating_add(leeway) => Err(ClaimError::Expired),
        Some(_) => Ok(()),
        None if strict => Err(ClaimError::Expired),
        None => Ok(()),
    }
}

pub(crate) fn check_not_before(nbf: Option<i64>, now: i64, leeway: i64) -> Result<(), ClaimError> {
    match nbf {
        Some(nbf) if now < nbf.saturating_sub(leeway) => Err(ClaimError::NotYetValid),
        _ => Ok(()),
    }
}

pub(crate) fn check_issued_at(iat: Option<i64>, now: i64, leeway: i64) -> Result<(), ClaimError> {
    match iat {
        Some(iat) if now < iat.saturating_sub(leeway) => Err(ClaimError::IssuedInFuture),
        _ => Ok(()),
    }
}

pub(crate) fn check_audience(actual: &Audience, expected: &Audience) -> Result<(), ClaimError> {
    if expected.is_empty() || actual.intersects(expected) {
        Ok(())
    } else {
        Err(ClaimError::Audience)
    }
}

fn check_equal(actual: Option<&str>, expected: &str, err: ClaimError) -> Result<(), ClaimError> {
    if actual == Some(expected) {
        Ok(())
    } else {
        Err(err)
    }
}

/// Passes when the token audience shares a member with `expected`, or when
/// `expected` is empty.
pub fn audience(expected: impl Into<Audience>) -> impl Validator {
    let expected = expected.into();
    move |claims: &StandardClaims| check_audience(&claims.aud, &expected)
}

/// Fails when `now >= exp`. A token without `exp` passes.
pub fn expiration(now: DateTime<Utc>) -> impl Validator {
    let now = now.timestamp();
    move |claims: &StandardClaims| check_expiration(claims.exp, now, 0, false)
}

/// Like [`expiration`], but a token without `exp` is expired.
pub fn strict_expiration(now: DateTime<Utc>) -> impl Validator {
    let now = now.timestamp();
    move |claims: &StandardClaims| check_expiration(claims.exp, now, 0, true)
}

/// Fails when `now < nbf`.
pub fn not_before(now: DateTime<Utc>) -> impl Validator {
    let now = now.timestamp();
    move |claims: &StandardClaims| check_not_before(claims.nbf, now, 0)
}

/// Fails when `now < iat`.
pub fn issued_at(now: DateTime<Utc>) -> impl Validator {
    let now = now.timestamp();
    move |claims: &StandardClaims| check_issued_at(claims.iat, now, 0)
}

/// Requires `iss == expected`.
pub fn issuer(expected: impl Into<String>) -> impl Validator {
    let expected = expected.into();
    move |claims: &StandardClaims| check_equal(claims.iss.as_deref(), &expected, ClaimError::Issuer)
}

/// Requires `sub == expected`.
pub fn subject(expected: impl Into<String>) -> impl Validator {
    let expected = expected.into();
    move |claims: &StandardClaims| check_equal(claims.sub.as_deref(), &expected, ClaimError::Subject)
}

/// Requires `jti == expected`.
pub fn id(expected: impl Into<String>) -> impl Validator {
    let expected = expected.into();
    move |claims: &StandardClaims| check_equal(claims.jti.as_deref(), &expected, ClaimError::Id)
}
