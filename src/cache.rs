//! Time-bounded memoization keyed by call arguments.
//!
//! [`TtlCache`] is a plain map of key → (value, stored-at). Expiry is purely
//! time-based: an entry older than the TTL is treated as absent and replaced
//! on the next insert. There is no event-based invalidation.
//!
//! The cache never reads the clock itself; callers pass `now`, which keeps it
//! deterministic under test.

use chrono::{DateTime, Duration, Local};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use tracing::debug;

/// Default cache window: one hour.
pub const DEFAULT_TTL_SECS: i64 = 3600;

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    stored_at: DateTime<Local>,
}

#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The stored value for `key`, if it was stored less than one TTL before `now`.
    pub fn get(&self, key: &K, now: DateTime<Local>) -> Option<V> {
        let entries = self.lock();
        let entry = entries.get(key)?;
        let age = now - entry.stored_at;
        if age < self.ttl {
            debug!(age_secs = age.num_seconds(), "cache hit");
            Some(entry.value.clone())
        } else {
            debug!(age_secs = age.num_seconds(), "cache entry expired");
            None
        }
    }

    pub fn insert(&self, key: K, value: V, now: DateTime<Local>) {
        self.lock().insert(
            key,
            CacheEntry {
                value,
                stored_at: now,
            },
        );
    }

    /// Drop every entry that has outlived the TTL. Returns how many were removed.
    pub fn purge_expired(&self, now: DateTime<Local>) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        let ttl = self.ttl;
        entries.retain(|_, entry| now - entry.stored_at < ttl);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<K, CacheEntry<V>>> {
        // A panic while holding the lock leaves the map itself intact.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 5, 6, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_get_within_ttl() {
        let cache = TtlCache::new(Duration::seconds(DEFAULT_TTL_SECS));
        cache.insert("k", 1, noon());
        assert_eq!(cache.get(&"k", noon() + Duration::minutes(59)), Some(1));
    }

    #[test]
    fn test_get_after_ttl_is_miss() {
        let cache = TtlCache::new(Duration::seconds(DEFAULT_TTL_SECS));
        cache.insert("k", 1, noon());
        assert_eq!(cache.get(&"k", noon() + Duration::hours(1)), None);
    }

    #[test]
    fn test_missing_key_is_miss() {
        let cache: TtlCache<&str, i32> = TtlCache::new(Duration::seconds(DEFAULT_TTL_SECS));
        assert_eq!(cache.get(&"nope", noon()), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_insert_replaces_and_restamps() {
        let cache = TtlCache::new(Duration::seconds(DEFAULT_TTL_SECS));
        cache.insert("k", 1, noon());
        let later = noon() + Duration::minutes(90);
        cache.insert("k", 2, later);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"k", later + Duration::minutes(30)), Some(2));
    }

    #[test]
    fn test_purge_expired() {
        let cache = TtlCache::new(Duration::minutes(10));
        cache.insert("old", 1, noon());
        cache.insert("new", 2, noon() + Duration::minutes(8));
        let removed = cache.purge_expired(noon() + Duration::minutes(12));
        assert_eq!(removed, 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"new", noon() + Duration::minutes(12)), Some(2));
    }
}
