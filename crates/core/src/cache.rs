//! Short-lived cache of subscription lookups
//!
//! Only successful lookups are stored (including "no subscription"). A failed
//! lookup is never cached, so an outage cannot pin a user to a stale answer.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::subscription::Subscription;

pub const DEFAULT_TTL_SECS: u64 = 300; // 5 minutes

#[derive(Debug, Clone)]
struct CachedLookup {
    subscription: Option<Subscription>,
    fetched_at: Instant,
}

#[derive(Debug)]
pub struct SubscriptionCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CachedLookup>>,
}

impl SubscriptionCache {
    /// A zero TTL disables caching.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Returns the cached lookup if present and within TTL.
    ///
    /// Outer `None` is a miss; `Some(None)` is a cached "no subscription".
    pub fn get(&self, user_id: &str) -> Option<Option<Subscription>> {
        if !self.is_enabled() {
            return None;
        }
        let mut entries = self.entries.lock().ok()?;
        let lookup = entries
            .get(user_id)
            .map(|e| (e.fetched_at.elapsed() <= self.ttl, e.subscription.clone()));
        match lookup {
            Some((true, subscription)) => Some(subscription),
            Some((false, _)) => {
                entries.remove(user_id);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, user_id: &str, subscription: Option<Subscription>) {
        if !self.is_enabled() {
            return;
        }
        if let Ok(mut entries) = self.entries.lock() {
            let ttl = self.ttl;
            entries.retain(|_, e| e.fetched_at.elapsed() <= ttl);
            entries.insert(
                user_id.to_string(),
                CachedLookup {
                    subscription,
                    fetched_at: Instant::now(),
                },
            );
        }
    }

    pub fn invalidate(&self, user_id: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(user_id);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SubscriptionCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TTL_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Plan;

    #[test]
    fn disabled_cache_never_stores() {
        let cache = SubscriptionCache::disabled();
        cache.insert("u1", Some(Subscription::active("u1", Plan::Year)));
        assert!(cache.get("u1").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn cached_none_is_a_hit() {
        let cache = SubscriptionCache::default();
        cache.insert("u1", None);
        assert_eq!(cache.get("u1"), Some(None));
    }

    #[test]
    fn expired_entry_is_evicted() {
        let cache = SubscriptionCache::new(Duration::from_millis(10));
        cache.insert("u1", None);
        std::thread::sleep(Duration::from_millis(30));
        assert!(cache.get("u1").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn insert_sweeps_expired_entries() {
        let cache = SubscriptionCache::new(Duration::from_millis(5));
        for i in 0..1000 {
            cache.insert(&format!("user-{i}"), None);
        }
        std::thread::sleep(Duration::from_millis(30));
        cache.insert("fresh", Some(Subscription::active("fresh", Plan::Month)));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("fresh").is_some());
    }
}
