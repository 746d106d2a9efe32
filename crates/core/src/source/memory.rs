//! In-memory subscription source for tests, demos and the offline CLI backend

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use super::{SourceError, SubscriptionSource};
use crate::subscription::Subscription;

/// Fixture-backed source keyed by user id.
///
/// `with_latency` sleeps before every lookup to mimic a network round trip.
/// `fail_for` makes lookups for a user return `SourceError::Unavailable`.
pub struct MemorySource {
    subscriptions: RwLock<HashMap<String, Subscription>>,
    failing: RwLock<HashSet<String>>,
    latency: Option<Duration>,
    lookups: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            failing: RwLock::new(HashSet::new()),
            latency: None,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn from_subscriptions(subscriptions: impl IntoIterator<Item = Subscription>) -> Self {
        let source = Self::new();
        for sub in subscriptions {
            source.insert(sub);
        }
        source
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Adds or replaces the subscription for `sub.user_id`.
    pub fn insert(&self, sub: Subscription) {
        if let Ok(mut subs) = self.subscriptions.write() {
            subs.insert(sub.user_id.clone(), sub);
        }
    }

    pub fn remove(&self, user_id: &str) -> Option<Subscription> {
        self.subscriptions.write().ok()?.remove(user_id)
    }

    pub fn fail_for(&self, user_id: &str) {
        if let Ok(mut failing) = self.failing.write() {
            failing.insert(user_id.to_string());
        }
    }

    pub fn recover(&self, user_id: &str) {
        if let Ok(mut failing) = self.failing.write() {
            failing.remove(user_id);
        }
    }

    /// Number of lookups served so far, failures included.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionSource for MemorySource {
    fn subscription(&self, user_id: &str) -> Result<Option<Subscription>, SourceError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }

        let failing = self
            .failing
            .read()
            .map_err(|e| SourceError::Unavailable(format!("lock poisoned: {e}")))?;
        if failing.contains(user_id) {
            return Err(SourceError::Unavailable(format!(
                "simulated outage for {user_id}"
            )));
        }

        let subs = self
            .subscriptions
            .read()
            .map_err(|e| SourceError::Unavailable(format!("lock poisoned: {e}")))?;
        Ok(subs.get(user_id).cloned())
    }
}
