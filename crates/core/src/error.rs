//! Error types shared across the entitlement modules

use crate::feature::FeatureId;
use crate::plan::Plan;

/// An identifier string that names no known plan or feature.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseIdError {
    #[error("unknown plan '{0}'")]
    Plan(String),
    #[error("unknown feature '{0}'")]
    Feature(String),
}

/// A defect in the plan hierarchy or feature mapping tables.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("plan hierarchy is empty")]
    EmptyHierarchy,
    #[error("plan '{0}' appears more than once in the hierarchy")]
    DuplicatePlan(Plan),
    #[error("feature '{0}' has no required plans")]
    NoRequiredPlans(FeatureId),
    #[error("feature '{feature}' requires plan '{plan}' which is not in the hierarchy")]
    PlanNotInHierarchy { feature: FeatureId, plan: Plan },
    #[error("feature '{0}' is defined more than once")]
    DuplicateFeature(FeatureId),
}
