//! Entitlement resolution: does a subscription unlock a feature, and if not,
//! which plan would?

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::feature::{FeatureDefinition, FeatureId, FeatureRegistry};
use crate::plan::{Plan, PlanInfo};
use crate::subscription::{Subscription, SubscriptionStatus};

/// Why a check came back without access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// No subscription record for the user
    NoSubscription,
    /// A subscription exists but is not `active`
    Inactive(SubscriptionStatus),
    /// The current plan is not in the feature's required set
    PlanNotEligible,
    /// The current plan is missing from the hierarchy
    UnknownPlan,
    /// The feature id is not in the registry
    UnknownFeature,
    /// The subscription lookup itself failed
    LookupFailed,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::NoSubscription => write!(f, "no subscription"),
            DenialReason::Inactive(status) => write!(f, "subscription is {status}"),
            DenialReason::PlanNotEligible => write!(f, "plan does not include this feature"),
            DenialReason::UnknownPlan => write!(f, "plan is not recognised"),
            DenialReason::UnknownFeature => write!(f, "unknown feature"),
            DenialReason::LookupFailed => write!(f, "subscription lookup failed"),
        }
    }
}

/// Outcome of a single entitlement check. Computed fresh, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessResult {
    /// `None` only when the caller passed an id that does not parse.
    pub feature: Option<FeatureId>,
    pub has_access: bool,
    pub required_plans: BTreeSet<Plan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_plan: Option<Plan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgrade_suggestion: Option<Plan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denial: Option<DenialReason>,
}

impl AccessResult {
    fn granted(feature: FeatureId, required_plans: BTreeSet<Plan>, plan: Plan) -> Self {
        Self {
            feature: Some(feature),
            has_access: true,
            required_plans,
            user_plan: Some(plan),
            upgrade_suggestion: None,
            denial: None,
        }
    }

    fn denied(
        feature: Option<FeatureId>,
        required_plans: BTreeSet<Plan>,
        user_plan: Option<Plan>,
        upgrade_suggestion: Option<Plan>,
        reason: DenialReason,
    ) -> Self {
        Self {
            feature,
            has_access: false,
            required_plans,
            user_plan,
            upgrade_suggestion,
            denial: Some(reason),
        }
    }

    /// Safe result for an id the registry does not know.
    pub fn unknown_feature(feature: Option<FeatureId>) -> Self {
        Self::denied(
            feature,
            BTreeSet::new(),
            None,
            None,
            DenialReason::UnknownFeature,
        )
    }

    /// Rewrites a no-subscription result as a failed lookup. Access stays
    /// denied and no plan is suggested, since the user's real plan is unknown.
    pub(crate) fn into_lookup_failed(mut self) -> Self {
        debug_assert!(!self.has_access);
        if self.denial == Some(DenialReason::NoSubscription) {
            self.denial = Some(DenialReason::LookupFailed);
            self.upgrade_suggestion = None;
        }
        self
    }
}

/// Upgrade answer for one feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub feature: Option<FeatureId>,
    pub has_access: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_plan: Option<Plan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_plan: Option<Plan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_info: Option<PlanInfo>,
}

/// Pure entitlement resolver over an injected registry.
#[derive(Debug, Clone)]
pub struct Resolver {
    registry: Arc<FeatureRegistry>,
}

impl Resolver {
    pub fn new(registry: Arc<FeatureRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FeatureRegistry {
        &self.registry
    }

    /// Decides whether `subscription` unlocks `feature`.
    ///
    /// Never panics. Missing subscriptions, inactive statuses, plans outside the
    /// hierarchy and unknown features all produce `has_access = false`.
    pub fn check_access(
        &self,
        subscription: Option<&Subscription>,
        feature: FeatureId,
    ) -> AccessResult {
        let result = match self.registry.get(feature) {
            Some(def) => self.resolve(subscription, def),
            None => AccessResult::unknown_feature(Some(feature)),
        };
        tracing::debug!(
            feature = %feature,
            plan = ?subscription.map(|s| s.plan),
            has_access = result.has_access,
            upgrade = ?result.upgrade_suggestion,
            "entitlement check"
        );
        result
    }

    /// Like [`check_access`](Self::check_access) but takes a raw id, mapping
    /// unparseable ids to the unknown-feature result.
    pub fn check_access_str(
        &self,
        subscription: Option<&Subscription>,
        feature_id: &str,
    ) -> AccessResult {
        match feature_id.parse::<FeatureId>() {
            Ok(id) => self.check_access(subscription, id),
            Err(e) => {
                tracing::debug!(error = %e, "entitlement check for unknown feature id");
                AccessResult::unknown_feature(None)
            }
        }
    }

    fn resolve(&self, subscription: Option<&Subscription>, def: &FeatureDefinition) -> AccessResult {
        let required = def.required_plans.clone();
        let hierarchy = self.registry.hierarchy();

        let sub = match subscription {
            None => {
                let entry = self.entry_plan(def);
                return AccessResult::denied(
                    Some(def.id),
                    required,
                    None,
                    entry,
                    DenialReason::NoSubscription,
                );
            }
            Some(sub) if !sub.is_active() => {
                let entry = self.entry_plan(def);
                return AccessResult::denied(
                    Some(def.id),
                    required,
                    None,
                    entry,
                    DenialReason::Inactive(sub.status),
                );
            }
            Some(sub) => sub,
        };

        let plan = sub.plan;
        if !hierarchy.contains(plan) {
            return AccessResult::denied(
                Some(def.id),
                required,
                Some(plan),
                None,
                DenialReason::UnknownPlan,
            );
        }

        if def.is_unlocked_by(plan) {
            return AccessResult::granted(def.id, required, plan);
        }

        // First match walking up the hierarchy, not the cheapest by price.
        let upgrade = hierarchy
            .above(plan)
            .iter()
            .copied()
            .find(|p| def.is_unlocked_by(*p));
        AccessResult::denied(
            Some(def.id),
            required,
            Some(plan),
            upgrade,
            DenialReason::PlanNotEligible,
        )
    }

    /// Lowest tier in hierarchy order that unlocks `def`.
    fn entry_plan(&self, def: &FeatureDefinition) -> Option<Plan> {
        self.registry
            .hierarchy()
            .iter()
            .find(|p| def.is_unlocked_by(*p))
    }

    /// Features the subscription unlocks, in registry order.
    pub fn accessible_features(&self, subscription: Option<&Subscription>) -> Vec<&FeatureDefinition> {
        self.registry
            .features()
            .filter(|def| self.resolve(subscription, def).has_access)
            .collect()
    }

    /// Upgrade answer for `feature`, with the suggested plan's catalog entry.
    pub fn suggestion(&self, subscription: Option<&Subscription>, feature: FeatureId) -> Suggestion {
        self.suggestion_from(self.check_access(subscription, feature))
    }

    /// Shapes an existing check result into an upgrade answer.
    pub fn suggestion_from(&self, result: AccessResult) -> Suggestion {
        let plan_info = result
            .upgrade_suggestion
            .and_then(|p| self.registry.plan_info(p).cloned());
        Suggestion {
            feature: result.feature,
            has_access: result.has_access,
            current_plan: result.user_plan,
            suggested_plan: result.upgrade_suggestion,
            plan_info,
        }
    }
}
