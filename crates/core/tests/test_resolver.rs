//! Tests for the entitlement resolver

use std::sync::Arc;

use wayfare_core::plan::default_catalog;
use wayfare_core::{
    DenialReason, FeatureCategory, FeatureDefinition, FeatureId, FeatureRegistry, Plan,
    PlanHierarchy, Resolver, Subscription, SubscriptionStatus,
};

const FEATURE: FeatureId = FeatureId::BlogPublishing;

fn resolver_with(required: &[Plan]) -> Resolver {
    resolver_with_hierarchy(PlanHierarchy::default(), required)
}

fn resolver_with_hierarchy(hierarchy: PlanHierarchy, required: &[Plan]) -> Resolver {
    let def = FeatureDefinition {
        id: FEATURE,
        name: "Blog publishing".to_string(),
        description: "Publish journals".to_string(),
        category: FeatureCategory::Blog,
        required_plans: required.iter().copied().collect(),
    };
    let registry = FeatureRegistry::new(hierarchy, default_catalog(), vec![def]).unwrap();
    Resolver::new(Arc::new(registry))
}

fn builtin() -> Resolver {
    Resolver::new(Arc::new(FeatureRegistry::builtin()))
}

// --- Membership decides access ---

#[test]
fn member_plan_always_has_access() {
    let resolver = builtin();
    for def in resolver.registry().features() {
        for plan in &def.required_plans {
            let sub = Subscription::active("u", *plan);
            let result = resolver.check_access(Some(&sub), def.id);
            assert!(result.has_access, "{plan} should unlock {}", def.id);
            assert_eq!(result.user_plan, Some(*plan));
            assert!(result.upgrade_suggestion.is_none());
            assert!(result.denial.is_none());
        }
    }
}

#[test]
fn non_member_plan_never_has_access() {
    let resolver = builtin();
    for def in resolver.registry().features() {
        for plan in Plan::ALL {
            if def.required_plans.contains(&plan) {
                continue;
            }
            let sub = Subscription::active("u", plan);
            let result = resolver.check_access(Some(&sub), def.id);
            assert!(!result.has_access, "{plan} should not unlock {}", def.id);
            assert_eq!(result.denial, Some(DenialReason::PlanNotEligible));
        }
    }
}

#[test]
fn missing_or_inactive_subscription_never_has_access() {
    let resolver = builtin();
    let statuses = [
        SubscriptionStatus::Pending,
        SubscriptionStatus::Expired,
        SubscriptionStatus::Cancelled,
    ];
    for id in FeatureId::ALL {
        assert!(!resolver.check_access(None, id).has_access);
        for plan in Plan::ALL {
            for status in statuses {
                let sub = Subscription::active("u", plan).with_status(status);
                let result = resolver.check_access(Some(&sub), id);
                assert!(!result.has_access, "{status} {plan} unlocked {id}");
                assert_eq!(result.user_plan, None);
                assert_eq!(result.denial, Some(DenialReason::Inactive(status)));
            }
        }
    }
}

// --- Upgrade suggestions ---

#[test]
fn suggestion_is_higher_tier_and_unlocks_feature() {
    let resolver = builtin();
    let hierarchy = resolver.registry().hierarchy().clone();
    for def in resolver.registry().features() {
        for plan in Plan::ALL {
            let sub = Subscription::active("u", plan);
            let result = resolver.check_access(Some(&sub), def.id);
            if let Some(upgrade) = result.upgrade_suggestion {
                assert!(hierarchy.position(upgrade) > hierarchy.position(plan));
                assert!(def.required_plans.contains(&upgrade));
            }
        }
    }
}

#[test]
fn suggestion_absent_for_top_tier() {
    let resolver = resolver_with(&[Plan::Week, Plan::Month]);
    let sub = Subscription::active("u", Plan::Year);
    let result = resolver.check_access(Some(&sub), FEATURE);
    assert!(!result.has_access);
    assert!(result.upgrade_suggestion.is_none());
}

#[test]
fn suggestion_absent_when_no_higher_tier_unlocks() {
    let resolver = resolver_with(&[Plan::Week]);
    let sub = Subscription::active("u", Plan::Month);
    let result = resolver.check_access(Some(&sub), FEATURE);
    assert!(!result.has_access);
    assert!(result.upgrade_suggestion.is_none());
}

#[test]
fn suggestion_is_first_hierarchy_match_not_cheapest() {
    // Hierarchy deliberately out of price order: year sits before season.
    let hierarchy = PlanHierarchy::new(vec![Plan::Week, Plan::Year, Plan::Season]);
    let resolver = resolver_with_hierarchy(hierarchy, &[Plan::Year, Plan::Season]);
    let sub = Subscription::active("u", Plan::Week);
    let result = resolver.check_access(Some(&sub), FEATURE);
    assert_eq!(result.upgrade_suggestion, Some(Plan::Year));
}

#[test]
fn no_subscription_suggests_entry_plan() {
    let resolver = resolver_with(&[Plan::Season, Plan::Year]);
    let result = resolver.check_access(None, FEATURE);
    assert_eq!(result.upgrade_suggestion, Some(Plan::Season));
    assert_eq!(result.denial, Some(DenialReason::NoSubscription));
}

// --- Concrete scenarios ---

#[test]
fn week_plan_needing_month_suggests_month() {
    let resolver = resolver_with(&[Plan::Month, Plan::Season, Plan::Year]);
    let sub = Subscription::active("u", Plan::Week);
    let result = resolver.check_access(Some(&sub), FEATURE);
    assert!(!result.has_access);
    assert_eq!(result.upgrade_suggestion, Some(Plan::Month));
}

#[test]
fn year_plan_does_not_imply_week_features() {
    let resolver = resolver_with(&[Plan::Week]);
    let sub = Subscription::active("u", Plan::Year);
    let result = resolver.check_access(Some(&sub), FEATURE);
    assert!(!result.has_access);
    assert_eq!(result.upgrade_suggestion, None);
    assert_eq!(result.user_plan, Some(Plan::Year));
}

#[test]
fn expired_year_plan_has_no_access() {
    let resolver = builtin();
    let sub = Subscription::active("u", Plan::Year).with_status(SubscriptionStatus::Expired);
    for id in FeatureId::ALL {
        assert!(!resolver.check_access(Some(&sub), id).has_access);
    }
}

#[test]
fn season_plan_with_season_feature_is_granted() {
    let resolver = resolver_with(&[Plan::Season, Plan::Year]);
    let sub = Subscription::active("u", Plan::Season);
    let result = resolver.check_access(Some(&sub), FEATURE);
    assert!(result.has_access);
    assert!(result.upgrade_suggestion.is_none());
}

// --- Fail closed ---

#[test]
fn plan_outside_hierarchy_fails_closed() {
    let hierarchy = PlanHierarchy::new(vec![Plan::Week, Plan::Month, Plan::Year]);
    let resolver = resolver_with_hierarchy(hierarchy, &[Plan::Season, Plan::Year]);
    let sub = Subscription::active("u", Plan::Season);
    let result = resolver.check_access(Some(&sub), FEATURE);
    assert!(!result.has_access, "out-of-hierarchy plan must not be granted");
    assert!(result.upgrade_suggestion.is_none());
    assert_eq!(result.denial, Some(DenialReason::UnknownPlan));
}

#[test]
fn feature_missing_from_registry_is_denied() {
    let resolver = resolver_with(&[Plan::Week]);
    let sub = Subscription::active("u", Plan::Week);
    let result = resolver.check_access(Some(&sub), FeatureId::OfflineMaps);
    assert!(!result.has_access);
    assert!(result.required_plans.is_empty());
    assert_eq!(result.denial, Some(DenialReason::UnknownFeature));
}

#[test]
fn unparseable_feature_id_is_denied() {
    let resolver = builtin();
    let sub = Subscription::active("u", Plan::Year);
    let result = resolver.check_access_str(Some(&sub), "teleportation");
    assert!(!result.has_access);
    assert_eq!(result.feature, None);
    assert_eq!(result.denial, Some(DenialReason::UnknownFeature));
}

#[test]
fn check_access_str_parses_known_ids() {
    let resolver = builtin();
    let sub = Subscription::active("u", Plan::Year);
    let result = resolver.check_access_str(Some(&sub), "priority-booking");
    assert!(result.has_access);
    assert_eq!(result.feature, Some(FeatureId::PriorityBooking));
}

// --- Purity ---

#[test]
fn repeated_checks_are_identical() {
    let resolver = builtin();
    let sub = Subscription::active("u", Plan::Week);
    for id in FeatureId::ALL {
        let a = resolver.check_access(Some(&sub), id);
        let b = resolver.check_access(Some(&sub), id);
        assert_eq!(a, b);
    }
}

// --- Derived operations ---

#[test]
fn accessible_features_match_membership() {
    let resolver = builtin();
    let sub = Subscription::active("u", Plan::Season);
    let ids: Vec<FeatureId> = resolver
        .accessible_features(Some(&sub))
        .iter()
        .map(|d| d.id)
        .collect();
    assert!(ids.contains(&FeatureId::OfflineMaps));
    assert!(!ids.contains(&FeatureId::CarRentalDeals));
    assert!(!ids.contains(&FeatureId::AdFree));
    assert!(resolver.accessible_features(None).is_empty());
}

#[test]
fn suggestion_carries_plan_info() {
    let resolver = builtin();
    let sub = Subscription::active("u", Plan::Week);
    let s = resolver.suggestion(Some(&sub), FeatureId::OfflineMaps);
    assert!(!s.has_access);
    assert_eq!(s.current_plan, Some(Plan::Week));
    assert_eq!(s.suggested_plan, Some(Plan::Season));
    assert_eq!(s.plan_info.unwrap().duration_days, 90);
}

#[test]
fn builtin_car_rental_skips_season() {
    let resolver = builtin();
    let sub = Subscription::active("u", Plan::Season);
    let result = resolver.check_access(Some(&sub), FeatureId::CarRentalDeals);
    assert!(!result.has_access);
    assert_eq!(result.upgrade_suggestion, Some(Plan::Year));
}

#[test]
fn access_result_json_omits_absent_fields() {
    let resolver = builtin();
    let sub = Subscription::active("u", Plan::Year);
    let json = serde_json::to_string(&resolver.check_access(Some(&sub), FeatureId::AdFree)).unwrap();
    assert!(json.contains("\"has_access\":true"));
    assert!(!json.contains("upgrade_suggestion"));
    assert!(!json.contains("denial"));
}
