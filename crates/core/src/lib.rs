//! Wayfare Core - Subscription Entitlements
//!
//! This crate decides which premium travel-app features a subscriber may use:
//! - Plan hierarchy and the feature-to-plan mapping (`FeatureRegistry`)
//! - The pure entitlement resolver with upgrade suggestions
//! - Subscription sources (in-memory fake, HTTP billing API) and a lookup cache
//! - The access gate view model used by front-ends
//!
//! The client-side decision is a UX convenience. Protected operations are
//! authorized again server-side.

pub mod access;
pub mod cache;
pub mod config;
pub mod error;
pub mod feature;
pub mod gate;
pub mod plan;
pub mod service;
pub mod source;
pub mod subscription;

pub use access::{AccessResult, DenialReason, Resolver, Suggestion};
pub use cache::SubscriptionCache;
pub use config::WayfareConfig;
pub use error::{ParseIdError, RegistryError};
pub use feature::{FeatureCategory, FeatureDefinition, FeatureId, FeatureRegistry};
pub use gate::{AccessGate, CheckTicket, GateState, GateView, Overlay, RestrictMode};
pub use plan::{Plan, PlanHierarchy, PlanInfo};
pub use service::EntitlementService;
pub use source::{MemorySource, SourceError, SubscriptionSource};
pub use subscription::{Subscription, SubscriptionStatus};

/// Wayfare version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
