//! Subscription plans and their ordering

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::ParseIdError;

/// A subscription tier.
///
/// The derived `Ord` is only used to keep sets deterministic. Tier order for
/// upgrade suggestions always comes from a [`PlanHierarchy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Week,
    Month,
    Season,
    Year,
}

impl Plan {
    pub const ALL: [Plan; 4] = [Plan::Week, Plan::Month, Plan::Season, Plan::Year];

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Week => "week",
            Plan::Month => "month",
            Plan::Season => "season",
            Plan::Year => "year",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Plan::Week),
            "month" => Ok(Plan::Month),
            "season" => Ok(Plan::Season),
            "year" => Ok(Plan::Year),
            _ => Err(ParseIdError::Plan(s.to_string())),
        }
    }
}

/// Ordered list of plans, lowest tier first.
///
/// A hierarchy is allowed to omit plans. Lookups for an omitted plan return
/// `None` and the resolver treats that as inconsistent data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanHierarchy(Vec<Plan>);

impl PlanHierarchy {
    pub fn new(plans: Vec<Plan>) -> Self {
        Self(plans)
    }

    /// Index of `plan` in tier order.
    pub fn position(&self, plan: Plan) -> Option<usize> {
        self.0.iter().position(|p| *p == plan)
    }

    pub fn contains(&self, plan: Plan) -> bool {
        self.position(plan).is_some()
    }

    /// Lowest tier.
    pub fn entry(&self) -> Option<Plan> {
        self.0.first().copied()
    }

    /// Highest tier.
    pub fn top(&self) -> Option<Plan> {
        self.0.last().copied()
    }

    /// Plans strictly above `plan`, ascending. Empty if `plan` is unknown.
    pub fn above(&self, plan: Plan) -> &[Plan] {
        match self.position(plan) {
            Some(idx) => &self.0[idx + 1..],
            None => &[],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Plan> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for PlanHierarchy {
    fn default() -> Self {
        Self(Plan::ALL.to_vec())
    }
}

/// Presentation metadata for a plan. Never consulted for access decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanInfo {
    pub name: String,
    pub price_cents: u32,
    pub duration_days: u32,
}

/// Builtin prices and durations shown on the pricing page.
pub fn default_catalog() -> BTreeMap<Plan, PlanInfo> {
    let info = |name: &str, price_cents, duration_days| PlanInfo {
        name: name.to_string(),
        price_cents,
        duration_days,
    };
    BTreeMap::from([
        (Plan::Week, info("Weekly Pass", 499, 7)),
        (Plan::Month, info("Monthly", 1299, 30)),
        (Plan::Season, info("Season", 2999, 90)),
        (Plan::Year, info("Yearly", 8999, 365)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn above_skips_current_and_lower_tiers() {
        let h = PlanHierarchy::default();
        assert_eq!(h.above(Plan::Month), &[Plan::Season, Plan::Year]);
        assert!(h.above(Plan::Year).is_empty());
    }

    #[test]
    fn above_unknown_plan_is_empty() {
        let h = PlanHierarchy::new(vec![Plan::Week, Plan::Year]);
        assert!(h.above(Plan::Month).is_empty());
        assert_eq!(h.position(Plan::Month), None);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Season".parse::<Plan>().unwrap(), Plan::Season);
        assert_eq!(" year ".parse::<Plan>().unwrap(), Plan::Year);
        assert!("lifetime".parse::<Plan>().is_err());
    }
}
