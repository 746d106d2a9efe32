//! Entitlement service: subscription lookup plus resolution, per user

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::access::{AccessResult, Resolver, Suggestion};
use crate::cache::SubscriptionCache;
use crate::feature::{FeatureDefinition, FeatureId, FeatureRegistry};
use crate::source::{SourceError, SubscriptionSource};
use crate::subscription::Subscription;

/// Answers entitlement questions for a user id.
///
/// Every lookup failure fails closed: the user is treated as having no
/// subscription for that call, and nothing is cached.
pub struct EntitlementService<S> {
    resolver: Resolver,
    source: S,
    cache: SubscriptionCache,
}

impl<S: SubscriptionSource> EntitlementService<S> {
    pub fn new(registry: Arc<FeatureRegistry>, source: S) -> Self {
        Self {
            resolver: Resolver::new(registry),
            source,
            cache: SubscriptionCache::default(),
        }
    }

    pub fn with_cache(mut self, cache: SubscriptionCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches the user's subscription, consulting the cache first.
    pub fn lookup(&self, user_id: &str) -> Result<Option<Subscription>, SourceError> {
        if let Some(hit) = self.cache.get(user_id) {
            tracing::trace!(user_id, "subscription cache hit");
            return Ok(hit);
        }
        let subscription = self.source.subscription(user_id)?;
        self.cache.insert(user_id, subscription.clone());
        Ok(subscription)
    }

    /// Drops any cached subscription for the user, e.g. after a purchase.
    pub fn invalidate(&self, user_id: &str) {
        self.cache.invalidate(user_id);
    }

    fn lookup_or_warn(&self, user_id: &str) -> Result<Option<Subscription>, ()> {
        self.lookup(user_id).map_err(|e| {
            tracing::warn!(user_id, error = %e, "subscription lookup failed, denying access");
        })
    }

    pub fn check(&self, user_id: &str, feature: FeatureId) -> AccessResult {
        match self.lookup_or_warn(user_id) {
            Ok(sub) => self.resolver.check_access(sub.as_ref(), feature),
            Err(()) => self.resolver.check_access(None, feature).into_lookup_failed(),
        }
    }

    /// Checks a raw feature id. Unknown ids yield the unknown-feature result.
    pub fn check_feature_access(&self, user_id: &str, feature_id: &str) -> AccessResult {
        match self.lookup_or_warn(user_id) {
            Ok(sub) => self.resolver.check_access_str(sub.as_ref(), feature_id),
            Err(()) => self
                .resolver
                .check_access_str(None, feature_id)
                .into_lookup_failed(),
        }
    }

    /// Features the user can use right now. Empty when the lookup fails.
    pub fn accessible_features(&self, user_id: &str) -> Vec<FeatureDefinition> {
        match self.lookup_or_warn(user_id) {
            Ok(sub) => self
                .resolver
                .accessible_features(sub.as_ref())
                .into_iter()
                .cloned()
                .collect(),
            Err(()) => Vec::new(),
        }
    }

    /// Upgrade suggestions keyed by the ids as given. One lookup per call.
    pub fn upgrade_suggestions(
        &self,
        user_id: &str,
        feature_ids: &[&str],
    ) -> BTreeMap<String, Suggestion> {
        let (sub, failed) = match self.lookup_or_warn(user_id) {
            Ok(sub) => (sub, false),
            Err(()) => (None, true),
        };
        feature_ids
            .iter()
            .map(|id| {
                let mut result = self.resolver.check_access_str(sub.as_ref(), id);
                if failed {
                    result = result.into_lookup_failed();
                }
                (id.to_string(), self.resolver.suggestion_from(result))
            })
            .collect()
    }
}
