//! Node.js bindings for Wayfare via NAPI-RS
//!
//! The web front-end calls these to drive its access gates. Every function
//! takes and returns JSON strings so the JS side owns its own types.
//! A subscription payload that does not parse is treated as no subscription.

use napi_derive::napi;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use wayfare_core::{FeatureRegistry, Resolver, Subscription};

fn resolver() -> &'static Resolver {
    static RESOLVER: OnceLock<Resolver> = OnceLock::new();
    RESOLVER.get_or_init(|| Resolver::new(Arc::new(FeatureRegistry::builtin())))
}

/// Parses a subscription payload. `null`, empty or malformed input yields `None`.
fn parse_subscription(json: Option<&str>) -> Option<Subscription> {
    let json = json?.trim();
    if json.is_empty() {
        return None;
    }
    serde_json::from_str::<Option<Subscription>>(json)
        .ok()
        .flatten()
}

fn to_json<T: serde::Serialize>(value: &T) -> napi::Result<String> {
    serde_json::to_string(value).map_err(|e| napi::Error::from_reason(e.to_string()))
}

#[napi]
pub fn check_feature_access(subscription_json: Option<String>, feature_id: String) -> napi::Result<String> {
    let sub = parse_subscription(subscription_json.as_deref());
    to_json(&resolver().check_access_str(sub.as_ref(), &feature_id))
}

#[napi]
pub fn accessible_features(subscription_json: Option<String>) -> napi::Result<String> {
    let sub = parse_subscription(subscription_json.as_deref());
    to_json(&resolver().accessible_features(sub.as_ref()))
}

#[napi]
pub fn upgrade_suggestions(
    subscription_json: Option<String>,
    feature_ids: Vec<String>,
) -> napi::Result<String> {
    let sub = parse_subscription(subscription_json.as_deref());
    let suggestions: BTreeMap<&str, _> = feature_ids
        .iter()
        .map(|id| {
            let result = resolver().check_access_str(sub.as_ref(), id);
            (id.as_str(), resolver().suggestion_from(result))
        })
        .collect();
    to_json(&suggestions)
}

#[napi]
pub fn list_features() -> napi::Result<String> {
    to_json(&resolver().registry().to_file())
}

#[napi]
pub fn get_version() -> String {
    wayfare_core::VERSION.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_access(json: &str) -> bool {
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        value["has_access"].as_bool().unwrap()
    }

    #[test]
    fn malformed_subscription_is_denied() {
        let json = check_feature_access(Some("{garbage".into()), "ad_free".into()).unwrap();
        assert!(!has_access(&json));
    }

    #[test]
    fn null_or_empty_subscription_is_denied() {
        for input in [Some("null".to_string()), Some("  ".to_string()), None] {
            let json = check_feature_access(input, "ad_free".into()).unwrap();
            assert!(!has_access(&json));
        }
    }

    #[test]
    fn subscription_without_status_is_denied() {
        let sub = r#"{"user_id": "u", "plan": "year"}"#;
        let json = check_feature_access(Some(sub.into()), "ad_free".into()).unwrap();
        assert!(!has_access(&json));
    }

    #[test]
    fn active_subscription_is_granted() {
        let sub = r#"{"user_id": "u", "plan": "year", "status": "active"}"#;
        let json = check_feature_access(Some(sub.into()), "ad_free".into()).unwrap();
        assert!(has_access(&json));
    }
}
