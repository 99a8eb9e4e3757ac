//! Reusable hash states for the HMAC, RSA and ECDSA families.
//!
//! Each algorithm instance owns one pool built from a template state (a fresh
//! digest, or an HMAC already keyed with the secret). Checkout pops an idle
//! state or clones the template; release resets the state and pushes it back.
//! A hasher therefore never carries bytes from one operation into the next.

use crossbeam::queue::ArrayQueue;
use digest::{FixedOutputReset, Reset, Update};
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use std::ops::{Deref, DerefMut};

use crate::error::{JwtError, JwtResult};

/// Idle hashers kept per algorithm instance.
pub const DEFAULT_POOL_CAPACITY: usize = 32;

/// SHA-2 variant an algorithm hashes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashFunction {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl HashFunction {
    /// Digest length in bytes.
    #[must_use]
    pub const fn output_size(self) -> usize {
        match self {
            HashFunction::Sha256 => 32,
            HashFunction::Sha384 => 48,
            HashFunction::Sha512 => 64,
        }
    }
}

/// A hash state that can absorb bytes, emit a digest and return to its
/// initial state.
pub trait PoolHash: Clone + Send {
    /// Absorb `data`.
    fn write(&mut self, data: &[u8]);
    /// Emit the digest and reset.
    fn sum_reset(&mut self) -> Vec<u8>;
    /// Discard absorbed bytes.
    fn reset_state(&mut self);
}

impl<H> PoolHash for H
where
    H: Update + FixedOutputReset + Reset + Clone + Send,
{
    #[inline]
    fn write(&mut self, data: &[u8]) {
        Update::update(self, data);
    }

    #[inline]
    fn sum_reset(&mut self) -> Vec<u8> {
        FixedOutputReset::finalize_fixed_reset(self).to_vec()
    }

    #[inline]
    fn reset_state(&mut self) {
        Reset::reset(self);
    }
}

/// Bounded lock-free pool of hash states cloned from one template.
pub struct HasherPool<H: PoolHash> {
    template: H,
    idle: ArrayQueue<H>,
}

impl<H: PoolHash> HasherPool<H> {
    /// Create a pool holding at most [`DEFAULT_POOL_CAPACITY`] idle states.
    #[must_use]
    pub fn new(template: H) -> Self {
        Self::with_capacity(template, DEFAULT_POOL_CAPACITY)
    }

    /// Create a pool holding at most `capacity` idle states (minimum one).
    #[must_use]
    pub fn with_capacity(template: H, capacity: usize) -> Self {
        Self {
            template,
            idle: ArrayQueue::new(capacity.max(1)),
        }
    }

    /// Take a ready-to-write hasher. It returns to the pool, reset, when dropped.
    pub fn checkout(&self) -> PooledHasher<'_, H> {
        let hasher = self.idle.pop().unwrap_or_else(|| {
            tracing::trace!("hasher pool empty, cloning template");
            self.template.clone()
        });
        PooledHasher {
            hasher: Some(hasher),
            pool: self,
        }
    }

    /// Hash `data` with a pooled state.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        let mut hasher = self.checkout();
        hasher.write(data);
        hasher.sum_reset()
    }

    /// Number of idle hashers currently pooled.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.idle.len()
    }

    fn release(&self, mut hasher: H) {
        hasher.reset_state();
        // A full pool drops the surplus state.
        let _ = self.idle.push(hasher);
    }
}

/// A hasher checked out of a [`HasherPool`].
pub struct PooledHasher<'a, H: PoolHash> {
    hasher: Option<H>,
    pool: &'a HasherPool<H>,
}

impl<H: PoolHash> Deref for PooledHasher<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        // Only `Drop` takes the hasher out.
        match &self.hasher {
            Some(hasher) => hasher,
            None => &self.pool.template,
        }
    }
}

impl<H: PoolHash> DerefMut for PooledHasher<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.hasher.get_or_insert_with(|| self.pool.template.clone())
    }
}

impl<H: PoolHash> Drop for PooledHasher<'_, H> {
    fn drop(&mut self) {
        if let Some(hasher) = self.hasher.take() {
            self.pool.release(hasher);
        }
    }
}

/// Digest pool for whichever SHA-2 variant an RSA or ECDSA algorithm uses.
pub(crate) enum DigestPool {
    Sha256(HasherPool<Sha256>),
    Sha384(HasherPool<Sha384>),
    Sha512(HasherPool<Sha512>),
}

impl DigestPool {
    pub(crate) fn new(hash: HashFunction) -> Self {
        match hash {
            HashFunction::Sha256 => DigestPool::Sha256(HasherPool::new(Sha256::default())),
            HashFunction::Sha384 => DigestPool::Sha384(HasherPool::new(Sha384::default())),
            HashFunction::Sha512 => DigestPool::Sha512(HasherPool::new(Sha512::default())),
        }
    }

    pub(crate) fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            DigestPool::Sha256(pool) => pool.digest(data),
            DigestPool::Sha384(pool) => pool.digest(data),
            DigestPool::Sha512(pool) => pool.digest(data),
        }
    }
}

/// Pool of HMAC states pre-keyed with one secret.
pub(crate) enum MacPool {
    Sha256(HasherPool<Hmac<Sha256>>),
    Sha384(HasherPool<Hmac<Sha384>>),
    Sha512(HasherPool<Hmac<Sha512>>),
}

impl MacPool {
    pub(crate) fn new(hash: HashFunction, secret: &[u8]) -> JwtResult<Self> {
        let invalid = |_| JwtError::invalid_key("HMAC key rejected");
        Ok(match hash {
            HashFunction::Sha256 => MacPool::Sha256(HasherPool::new(
                <Hmac<Sha256> as Mac>::new_from_slice(secret).map_err(invalid)?,
            )),
            HashFunction::Sha384 => MacPool::Sha384(HasherPool::new(
                <Hmac<Sha384> as Mac>::new_from_slice(secret).map_err(invalid)?,
            )),
            HashFunction::Sha512 => MacPool::Sha512(HasherPool::new(
                <Hmac<Sha512> as Mac>::new_from_slice(secret).map_err(invalid)?,
            )),
        })
    }

    pub(crate) fn tag(&self, data: &[u8]) -> Vec<u8> {
        match self {
            MacPool::Sha256(pool) => pool.digest(data),
            MacPool::Sha384(pool) => pool.digest(data),
            MacPool::Sha512(pool) => pool.digest(data),
        }
    }
}
