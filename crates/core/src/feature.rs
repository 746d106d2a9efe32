//! Feature registry: which plans unlock which gated capabilities
//!
//! The registry is configuration: it is built once (from the builtin tables or
//! a TOML file), validated, and then shared read-only behind an `Arc`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ParseIdError, RegistryError};
use crate::plan::{default_catalog, Plan, PlanHierarchy, PlanInfo};

/// A gated capability of the travel app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureId {
    BlogPublishing,
    BlogDrafts,
    RichTextEmbeds,
    UnlimitedDestinations,
    TripSharing,
    OfflineMaps,
    CarRentalDeals,
    PriorityBooking,
    ExpenseTracker,
    AdFree,
}

impl FeatureId {
    pub const ALL: [FeatureId; 10] = [
        FeatureId::BlogPublishing,
        FeatureId::BlogDrafts,
        FeatureId::RichTextEmbeds,
        FeatureId::UnlimitedDestinations,
        FeatureId::TripSharing,
        FeatureId::OfflineMaps,
        FeatureId::CarRentalDeals,
        FeatureId::PriorityBooking,
        FeatureId::ExpenseTracker,
        FeatureId::AdFree,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureId::BlogPublishing => "blog_publishing",
            FeatureId::BlogDrafts => "blog_drafts",
            FeatureId::RichTextEmbeds => "rich_text_embeds",
            FeatureId::UnlimitedDestinations => "unlimited_destinations",
            FeatureId::TripSharing => "trip_sharing",
            FeatureId::OfflineMaps => "offline_maps",
            FeatureId::CarRentalDeals => "car_rental_deals",
            FeatureId::PriorityBooking => "priority_booking",
            FeatureId::ExpenseTracker => "expense_tracker",
            FeatureId::AdFree => "ad_free",
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_ascii_lowercase();
        FeatureId::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| ParseIdError::Feature(s.to_string()))
    }
}

/// Grouping used by the pricing page. Presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureCategory {
    Blog,
    Trips,
    Rentals,
    Account,
}

impl fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureCategory::Blog => write!(f, "Blog"),
            FeatureCategory::Trips => write!(f, "Trips"),
            FeatureCategory::Rentals => write!(f, "Rentals"),
            FeatureCategory::Account => write!(f, "Account"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDefinition {
    pub id: FeatureId,
    pub name: String,
    pub description: String,
    pub category: FeatureCategory,
    /// Plans that unlock this feature. Only membership grants access; a higher
    /// tier that is missing from this set does not.
    pub required_plans: BTreeSet<Plan>,
}

impl FeatureDefinition {
    pub fn is_unlocked_by(&self, plan: Plan) -> bool {
        self.required_plans.contains(&plan)
    }
}

/// On-disk registry layout (`registry.toml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryFile {
    #[serde(default)]
    pub hierarchy: PlanHierarchy,

    #[serde(default)]
    pub plans: Vec<PlanEntry>,

    #[serde(default)]
    pub features: Vec<FeatureDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanEntry {
    pub plan: Plan,
    #[serde(flatten)]
    pub info: PlanInfo,
}

/// Immutable plan hierarchy, plan catalog and feature mapping.
#[derive(Debug, Clone)]
pub struct FeatureRegistry {
    hierarchy: PlanHierarchy,
    catalog: BTreeMap<Plan, PlanInfo>,
    features: BTreeMap<FeatureId, FeatureDefinition>,
}

impl FeatureRegistry {
    /// Builds a registry from parts. Later definitions of the same feature
    /// are rejected rather than silently overwriting earlier ones.
    pub fn new(
        hierarchy: PlanHierarchy,
        catalog: BTreeMap<Plan, PlanInfo>,
        definitions: Vec<FeatureDefinition>,
    ) -> Result<Self, RegistryError> {
        let mut features = BTreeMap::new();
        for def in definitions {
            let id = def.id;
            if features.insert(id, def).is_some() {
                return Err(RegistryError::DuplicateFeature(id));
            }
        }
        Ok(Self {
            hierarchy,
            catalog,
            features,
        })
    }

    /// The tables shipped with the app.
    pub fn builtin() -> Self {
        let features = builtin_definitions()
            .into_iter()
            .map(|def| (def.id, def))
            .collect();
        Self {
            hierarchy: PlanHierarchy::default(),
            catalog: default_catalog(),
            features,
        }
    }

    /// Parses and validates a registry from TOML text.
    ///
    /// Plans missing from `[[plans]]` fall back to the builtin catalog entry.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: RegistryFile = toml::from_str(contents).context("parse registry")?;
        let mut catalog = default_catalog();
        for entry in file.plans {
            catalog.insert(entry.plan, entry.info);
        }
        let registry = Self::new(file.hierarchy, catalog, file.features)?;
        registry.validate()?;
        Ok(registry)
    }

    /// Loads a registry file, failing on any configuration defect.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("read registry {}", path.display()))?;
        let registry = Self::from_toml_str(&contents)
            .with_context(|| format!("load registry {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            features = registry.features.len(),
            plans = registry.hierarchy.len(),
            "loaded feature registry"
        );
        Ok(registry)
    }

    /// Checks the tables for configuration defects.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.hierarchy.is_empty() {
            return Err(RegistryError::EmptyHierarchy);
        }
        let mut seen = BTreeSet::new();
        for plan in self.hierarchy.iter() {
            if !seen.insert(plan) {
                return Err(RegistryError::DuplicatePlan(plan));
            }
        }
        for def in self.features.values() {
            if def.required_plans.is_empty() {
                return Err(RegistryError::NoRequiredPlans(def.id));
            }
            if let Some(plan) = def
                .required_plans
                .iter()
                .find(|p| !self.hierarchy.contains(**p))
            {
                return Err(RegistryError::PlanNotInHierarchy {
                    feature: def.id,
                    plan: *plan,
                });
            }
        }
        Ok(())
    }

    pub fn hierarchy(&self) -> &PlanHierarchy {
        &self.hierarchy
    }

    pub fn get(&self, id: FeatureId) -> Option<&FeatureDefinition> {
        self.features.get(&id)
    }

    pub fn plan_info(&self, plan: Plan) -> Option<&PlanInfo> {
        self.catalog.get(&plan)
    }

    /// All definitions in `FeatureId` order.
    pub fn features(&self) -> impl Iterator<Item = &FeatureDefinition> {
        self.features.values()
    }

    /// Definitions unlocked by `plan`, in `FeatureId` order.
    pub fn unlocked_by(&self, plan: Plan) -> impl Iterator<Item = &FeatureDefinition> {
        self.features.values().filter(move |d| d.is_unlocked_by(plan))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Serializable form, used by `wayfare plans --format json` and the
    /// registry template.
    pub fn to_file(&self) -> RegistryFile {
        RegistryFile {
            hierarchy: self.hierarchy.clone(),
            plans: self
                .catalog
                .iter()
                .map(|(plan, info)| PlanEntry {
                    plan: *plan,
                    info: info.clone(),
                })
                .collect(),
            features: self.features.values().cloned().collect(),
        }
    }
}

impl Default for FeatureRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_definitions() -> Vec<FeatureDefinition> {
    use FeatureCategory::*;
    use Plan::*;

    let def = |id, name: &str, description: &str, category, plans: &[Plan]| FeatureDefinition {
        id,
        name: name.to_string(),
        description: description.to_string(),
        category,
        required_plans: plans.iter().copied().collect(),
    };

    // Hand-authored per feature. Car rental deals skip `season` and ad-free
    // skips the middle tiers; do not assume higher tiers unlock more.
    vec![
        def(
            FeatureId::BlogPublishing,
            "Blog publishing",
            "Publish travel journals to your public profile",
            Blog,
            &[Month, Season, Year],
        ),
        def(
            FeatureId::BlogDrafts,
            "Unlimited drafts",
            "Keep any number of unpublished journal drafts",
            Blog,
            &[Week, Month, Season, Year],
        ),
        def(
            FeatureId::RichTextEmbeds,
            "Rich media embeds",
            "Embed maps, galleries and videos in journal entries",
            Blog,
            &[Season, Year],
        ),
        def(
            FeatureId::UnlimitedDestinations,
            "Unlimited destinations",
            "Add more than five destinations to a single trip",
            Trips,
            &[Month, Season, Year],
        ),
        def(
            FeatureId::TripSharing,
            "Trip sharing",
            "Invite companions to view and edit a trip plan",
            Trips,
            &[Week, Month, Season, Year],
        ),
        def(
            FeatureId::OfflineMaps,
            "Offline maps",
            "Download destination maps for use without a connection",
            Trips,
            &[Season, Year],
        ),
        def(
            FeatureId::CarRentalDeals,
            "Car rental deals",
            "Member-only prices from partner rental agencies",
            Rentals,
            &[Month, Year],
        ),
        def(
            FeatureId::PriorityBooking,
            "Priority booking",
            "Reserve rental cars before public availability opens",
            Rentals,
            &[Year],
        ),
        def(
            FeatureId::ExpenseTracker,
            "Expense tracker",
            "Track and split trip expenses across currencies",
            Trips,
            &[Month, Season, Year],
        ),
        def(
            FeatureId::AdFree,
            "Ad-free browsing",
            "Hide sponsored listings across the app",
            Account,
            &[Week, Year],
        ),
    ]
}
