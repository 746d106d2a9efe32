//! Subscription lookup abstraction
//!
//! Provides a `SubscriptionSource` trait that decouples entitlement checks from
//! the billing backend. Two implementations:
//! - `MemorySource`: in-memory fixtures with optional simulated latency (always available)
//! - `HttpSource`: JSON over HTTPS against the billing API (behind `http-source` feature)

pub mod memory;

#[cfg(feature = "http-source")]
pub mod http;

pub use memory::MemorySource;

#[cfg(feature = "http-source")]
pub use http::HttpSource;

use crate::subscription::Subscription;

/// Failure to fetch a subscription. Callers treat every variant as "no access".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(String),
    #[error("billing API returned HTTP {0}")]
    Status(u16),
    #[error("could not decode subscription response: {0}")]
    Decode(String),
    #[error("subscription source unavailable: {0}")]
    Unavailable(String),
}

/// Where subscriptions come from.
///
/// `Ok(None)` means the user has no subscription; `Err` means the lookup
/// itself failed and says nothing about the user.
pub trait SubscriptionSource: Send + Sync {
    fn subscription(&self, user_id: &str) -> Result<Option<Subscription>, SourceError>;
}

impl<S: SubscriptionSource + ?Sized> SubscriptionSource for Box<S> {
    fn subscription(&self, user_id: &str) -> Result<Option<Subscription>, SourceError> {
        (**self).subscription(user_id)
    }
}

impl<S: SubscriptionSource + ?Sized> SubscriptionSource for std::sync::Arc<S> {
    fn subscription(&self, user_id: &str) -> Result<Option<Subscription>, SourceError> {
        (**self).subscription(user_id)
    }
}
