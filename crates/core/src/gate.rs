//! Access gate: the view model wrapped around gated content
//!
//! A gate is mounted for one feature, waits for an entitlement check, and then
//! either passes its content through or replaces it with an upgrade prompt.
//! Gated content only ever reaches the output after a granted result for the
//! gate's own feature.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::access::{AccessResult, DenialReason};
use crate::feature::FeatureId;
use crate::plan::Plan;

/// What a denied gate shows instead of its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RestrictMode {
    /// Render nothing
    Hide,
    /// Non-interactive overlay with an upgrade call to action
    Blur,
    /// Full lock screen with an upgrade call to action
    #[default]
    Lock,
}

impl fmt::Display for RestrictMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestrictMode::Hide => write!(f, "hide"),
            RestrictMode::Blur => write!(f, "blur"),
            RestrictMode::Lock => write!(f, "lock"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Loading,
    Granted,
    Denied,
}

/// Identifies one in-flight check. Results carrying an old ticket are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckTicket(u64);

/// Upgrade prompt shown in place of gated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlay {
    pub feature: FeatureId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade: Option<Plan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenialReason>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateView<T> {
    Loading,
    Content(T),
    Hidden,
    Blurred(Overlay),
    Locked(Overlay),
}

impl<T> GateView<T> {
    pub fn content(&self) -> Option<&T> {
        match self {
            GateView::Content(c) => Some(c),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct AccessGate {
    feature: FeatureId,
    mode: RestrictMode,
    state: GateState,
    result: Option<AccessResult>,
    generation: u64,
    mounted: bool,
}

impl AccessGate {
    /// Mounts a gate in the loading state and returns the ticket for its first check.
    pub fn mount(feature: FeatureId, mode: RestrictMode) -> (Self, CheckTicket) {
        let gate = Self {
            feature,
            mode,
            state: GateState::Loading,
            result: None,
            generation: 0,
            mounted: true,
        };
        (gate, CheckTicket(0))
    }

    pub fn feature(&self) -> FeatureId {
        self.feature
    }

    pub fn mode(&self) -> RestrictMode {
        self.mode
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// The last applied result, if the check succeeded.
    pub fn result(&self) -> Option<&AccessResult> {
        self.result.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Applies a finished check.
    ///
    /// Returns `false` and changes nothing when the gate was unmounted or the
    /// ticket belongs to a superseded check. A failed check denies access.
    pub fn resolve<E: fmt::Display>(
        &mut self,
        ticket: CheckTicket,
        outcome: Result<AccessResult, E>,
    ) -> bool {
        if !self.mounted || ticket.0 != self.generation {
            tracing::debug!(feature = %self.feature, "discarding stale entitlement result");
            return false;
        }

        match outcome {
            Ok(result) if result.feature != Some(self.feature) => {
                tracing::warn!(
                    feature = %self.feature,
                    got = ?result.feature,
                    "entitlement result is for another feature"
                );
                self.state = GateState::Denied;
                self.result = Some(AccessResult::unknown_feature(Some(self.feature)));
            }
            Ok(result) => {
                self.state = if result.has_access {
                    GateState::Granted
                } else {
                    GateState::Denied
                };
                self.result = Some(result);
            }
            Err(e) => {
                tracing::warn!(feature = %self.feature, error = %e, "entitlement check failed");
                self.state = GateState::Denied;
                self.result = None;
            }
        }
        true
    }

    /// Starts a new check (user-triggered refresh). Earlier tickets become stale.
    pub fn refresh(&mut self) -> Option<CheckTicket> {
        if !self.mounted {
            return None;
        }
        self.generation += 1;
        self.state = GateState::Loading;
        self.result = None;
        Some(CheckTicket(self.generation))
    }

    /// Tears the gate down. Any pending result will be discarded.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    /// Produces the view for the current state. `content` is dropped unless granted.
    pub fn render<T>(&self, content: T) -> GateView<T> {
        match self.state {
            GateState::Loading => GateView::Loading,
            GateState::Granted => GateView::Content(content),
            GateState::Denied => {
                let overlay = Overlay {
                    feature: self.feature,
                    upgrade: self.result.as_ref().and_then(|r| r.upgrade_suggestion),
                    reason: self
                        .result
                        .as_ref()
                        .map_or(Some(DenialReason::LookupFailed), |r| r.denial),
                };
                match self.mode {
                    RestrictMode::Hide => GateView::Hidden,
                    RestrictMode::Blur => GateView::Blurred(overlay),
                    RestrictMode::Lock => GateView::Locked(overlay),
                }
            }
        }
    }
}
