//! Response cache for the HTTP layer.
//!
//! Keyed by the SHA-256 of the raw request body. Entries expire a fixed time
//! after insertion (absolute TTL, reads do not refresh). A zero TTL disables
//! caching.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

pub struct ResponseCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, V)>>,
}

impl<V: Clone> ResponseCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Live entry for `key`; an expired one is evicted on the way.
    pub fn get(&self, key: &str) -> Option<V> {
        if !self.is_enabled() {
            return None;
        }
        let mut map = self.lock();
        let expired = match map.get(key) {
            Some((at, v)) if at.elapsed() < self.ttl => return Some(v.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            map.remove(key);
        }
        None
    }

    pub fn insert(&self, key: String, value: V) {
        if !self.is_enabled() {
            return;
        }
        let mut map = self.lock();
        let ttl = self.ttl;
        map.retain(|_, (at, _)| at.elapsed() < ttl);
        map.insert(key, (Instant::now(), value));
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock leaves the map usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, (Instant, V)>> {
        match self.entries.lock() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        }
    }
}

/// Lower-case hex SHA-256 of `bytes`.
pub fn cache_key(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(64);
    for b in digest.iter() {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
