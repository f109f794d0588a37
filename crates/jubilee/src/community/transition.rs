//! Stepwise escalation for displays that must not skip a tier.
//!
//! [`AlertEngine::evaluate`](super::AlertEngine::evaluate) recomputes the level
//! from scratch and may jump straight from quiet to confirmed. Clients that
//! want a visible WATCH stage feed each computed level through
//! [`step_toward`] together with the level they are currently showing.

use serde::{Deserialize, Serialize};

use super::escalation::AlertLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertTransition {
    pub from: AlertLevel,
    pub to: AlertLevel,
    /// Level the engine computed for this evaluation.
    pub computed: AlertLevel,
}

impl AlertTransition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }

    pub fn escalated(&self) -> bool {
        self.to > self.from
    }

    /// True when `to` is lower than `computed` because a tier was skipped.
    pub fn held_back(&self) -> bool {
        self.to < self.computed
    }
}

/// Moves `current` toward `computed`: rises at most one tier, falls at once.
pub fn step_toward(current: AlertLevel, computed: AlertLevel) -> AlertTransition {
    let to = if computed > current {
        match current {
            AlertLevel::None => AlertLevel::Watch,
            AlertLevel::Watch | AlertLevel::Confirmed => AlertLevel::Confirmed,
        }
    } else {
        computed
    };

    AlertTransition {
        from: current,
        to,
        computed,
    }
}
