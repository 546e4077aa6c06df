//! Local identifier minting and origin classification.
//!
//! The identifier domain is partitioned: ids minted locally are millisecond
//! clock values (always at or above [`LOCAL_ID_THRESHOLD`]), while ids
//! assigned by the remote store are small sequential integers. A record keeps
//! its local id only until the remote store confirms its creation, at which
//! point it is re-keyed by the server-assigned id.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Any id at or above this value was minted by a local [`IdentityResolver`].
/// Millisecond timestamps clear it by three orders of magnitude; remote
/// stores assign ids nowhere near it.
pub const LOCAL_ID_THRESHOLD: i64 = 1_000_000_000_000;

/// Mints process-unique local identifiers and classifies id origin.
#[derive(Debug)]
pub struct IdentityResolver {
    last_issued: AtomicI64,
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self {
            last_issued: AtomicI64::new(0),
        }
    }

    /// Returns a fresh local identifier, strictly greater than any previously
    /// issued by this resolver instance.
    ///
    /// Based on the millisecond clock; if the clock has not advanced since
    /// the last call (or moved backwards), falls back to last issued + 1 so
    /// two calls never collide.
    pub fn new_local_id(&self) -> i64 {
        let now = Utc::now().timestamp_millis().max(LOCAL_ID_THRESHOLD);
        let mut prev = self.last_issued.load(Ordering::Relaxed);
        loop {
            let candidate = if now > prev { now } else { prev + 1 };
            match self.last_issued.compare_exchange(
                prev,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }

    /// Whether `id` was minted locally (true) or assigned by the remote
    /// store (false).
    pub fn is_local_origin(id: i64) -> bool {
        id >= LOCAL_ID_THRESHOLD
    }
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_ids_are_local_origin() {
        let resolver = IdentityResolver::new();
        let id = resolver.new_local_id();
        assert!(IdentityResolver::is_local_origin(id));
    }

    #[test]
    fn server_style_ids_are_remote_origin() {
        assert!(!IdentityResolver::is_local_origin(1));
        assert!(!IdentityResolver::is_local_origin(999_999));
        assert!(!IdentityResolver::is_local_origin(LOCAL_ID_THRESHOLD - 1));
    }

    #[test]
    fn rapid_minting_never_collides() {
        let resolver = IdentityResolver::new();
        let mut prev = 0;
        for _ in 0..1000 {
            let id = resolver.new_local_id();
            assert!(id > prev, "ids must be strictly increasing");
            prev = id;
        }
    }
}
