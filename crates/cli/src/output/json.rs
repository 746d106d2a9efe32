//! JSON output formatting

use serde::Serialize;
use std::collections::BTreeMap;
use wayfare_core::{AccessResult, FeatureDefinition, GateView, Overlay, Suggestion};

#[derive(Debug, Serialize)]
pub struct JsonCheck<'a> {
    pub user: &'a str,
    pub result: &'a AccessResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<JsonView>,
}

/// Gate view without the gated content itself.
#[derive(Debug, Serialize)]
pub struct JsonView {
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<Overlay>,
}

impl JsonView {
    pub fn from_view<T>(view: &GateView<T>) -> Self {
        let (state, overlay) = match view {
            GateView::Loading => ("loading", None),
            GateView::Content(_) => ("granted", None),
            GateView::Hidden => ("hidden", None),
            GateView::Blurred(o) => ("blurred", Some(o.clone())),
            GateView::Locked(o) => ("locked", Some(o.clone())),
        };
        Self { state, overlay }
    }
}

#[derive(Debug, Serialize)]
pub struct JsonFeatures<'a> {
    pub user: &'a str,
    pub features: &'a [FeatureDefinition],
}

#[derive(Debug, Serialize)]
pub struct JsonUpgrades<'a> {
    pub user: &'a str,
    pub suggestions: &'a BTreeMap<String, Suggestion>,
}

/// Prints `value` as pretty JSON on stdout.
pub fn print<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize JSON: {}", e),
    }
}
