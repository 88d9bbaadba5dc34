// src/fetch/cache.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A cached value and the instant it stops being served.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: Arc<T>,
    expires_at: Instant,
}

/// Expiry-only cache for dataset fetches, keyed by dataset name.
///
/// Values are shared out as `Arc`s, never cloned. There is no
/// fetch-coalescing: two callers refreshing the same key concurrently both
/// fetch, and the last insert wins. Dataset computation is idempotent, so a
/// doubled fetch costs time, not correctness.
#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The live value for `key`. Expired entries are removed on the way out.
    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        let mut entries = self.entries.lock().unwrap();
        let expired = match entries.get(key) {
            Some(entry) => {
                if entry.expires_at > Instant::now() {
                    return Some(Arc::clone(&entry.value));
                }
                true
            }
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        None
    }

    /// Store a value under `key`, replacing any previous entry, and return
    /// the shared handle.
    pub fn insert(&self, key: impl Into<String>, value: T) -> Arc<T> {
        let value = Arc::new(value);
        let entry = CacheEntry {
            value: Arc::clone(&value),
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.lock().unwrap().insert(key.into(), entry);
        value
    }

    /// Drop `key` immediately, regardless of expiry.
    pub fn invalidate(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries
            .lock()
            .unwrap()
            .retain(|_, entry| entry.expires_at > now);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
