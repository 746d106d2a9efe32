//! Subscription records as returned by the billing backend

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::plan::Plan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    #[default]
    Pending,
    Expired,
    Cancelled,
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionStatus::Active => write!(f, "active"),
            SubscriptionStatus::Pending => write!(f, "pending"),
            SubscriptionStatus::Expired => write!(f, "expired"),
            SubscriptionStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A user's subscription. Read-only from the resolver's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub user_id: String,
    #[serde(alias = "plan_id")]
    pub plan: Plan,
    #[serde(default)]
    pub status: SubscriptionStatus,
    /// Unix seconds
    #[serde(default)]
    pub start_at: u64,
    /// Unix seconds
    #[serde(default)]
    pub end_at: u64,
    #[serde(default)]
    pub auto_renew: bool,
}

impl Subscription {
    /// Shorthand for an active subscription, mostly for tests and fixtures.
    pub fn active(user_id: impl Into<String>, plan: Plan) -> Self {
        Self {
            user_id: user_id.into(),
            plan,
            status: SubscriptionStatus::Active,
            start_at: 0,
            end_at: 0,
            auto_renew: false,
        }
    }

    pub fn with_status(mut self, status: SubscriptionStatus) -> Self {
        self.status = status;
        self
    }

    /// Only `active` grants access; every other status counts as no subscription.
    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }
}
