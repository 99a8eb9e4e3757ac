//! `jti` replay protection.
//!
//! [`ReplayCache`] counts how often each token ID has been presented and
//! rejects it once the count passes `max_uses`. Entries live until the
//! token's `exp` when it has one, otherwise for the default TTL, and are
//! reset on first access after they lapse.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::claims::StandardClaims;
use crate::error::ClaimError;
use crate::validators::Validator;

/// Uses allowed per `jti` by [`ReplayCache::new`].
pub const DEFAULT_MAX_USES: u32 = 5;

/// Entry lifetime for tokens without `exp`.
pub fn default_ttl() -> Duration {
    Duration::hours(24)
}

#[derive(Debug, Clone, Copy)]
struct ReplayEntry {
    uses: u32,
    expires_at: DateTime<Utc>,
}

/// Concurrent use counter keyed by `jti`.
#[derive(Debug)]
pub struct ReplayCache {
    entries: DashMap<String, ReplayEntry>,
    max_uses: u32,
    default_ttl: Duration,
}

impl Default for ReplayCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplayCache {
    /// [`DEFAULT_MAX_USES`] uses per ID, 24 hour default TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_USES, default_ttl())
    }

    /// Custom use limit and default TTL.
    #[must_use]
    pub fn with_limits(max_uses: u32, default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_uses,
            default_ttl,
        }
    }

    /// Count one use of `jti` at `now`, returning the new count.
    ///
    /// `exp` (Unix seconds) bounds the entry lifetime when it lies in the
    /// future. Fails with [`ClaimError::IdReplayed`] once the count exceeds
    /// the limit; the rejected use is still counted.
    pub fn record(&self, jti: &str, exp: Option<i64>, now: DateTime<Utc>) -> Result<u32, ClaimError> {
        let expires_at = exp
            .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
            .filter(|exp| *exp > now)
            .unwrap_or_else(|| now + self.default_ttl);

        let mut entry = self
            .entries
            .entry(jti.to_owned())
            .or_insert(ReplayEntry { uses: 0, expires_at });
        if entry.expires_at <= now {
            *entry = ReplayEntry { uses: 0, expires_at };
        }
        entry.uses = entry.uses.saturating_add(1);
        let uses = entry.uses;
        drop(entry);

        if uses > self.max_uses {
            tracing::warn!(uses, max_uses = self.max_uses, "token ID replay rejected");
            return Err(ClaimError::IdReplayed);
        }
        Ok(uses)
    }

    /// Uses recorded for `jti` that have not lapsed at `now`.
    #[must_use]
    pub fn uses(&self, jti: &str, now: DateTime<Utc>) -> u32 {
        self.entries
            .get(jti)
            .filter(|entry| entry.expires_at > now)
            .map_or(0, |entry| entry.uses)
    }

    /// Forget one ID.
    pub fn remove(&self, jti: &str) {
        self.entries.remove(jti);
    }

    /// Drop entries that have lapsed at `now`, returning how many were removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    /// Forget every ID.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of tracked IDs, lapsed ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no IDs are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A validator that records each token's `jti` against the system clock.
    /// Tokens without `jti` fail with [`ClaimError::MissingId`].
    pub fn validator(&self) -> impl Validator + '_ {
        move |claims: &StandardClaims| {
            let jti = claims.jti.as_deref().ok_or(ClaimError::MissingId)?;
            self.record(jti, claims.exp, Utc::now()).map(drop)
        }
    }
}
