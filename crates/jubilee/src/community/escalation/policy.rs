use serde::{Deserialize, Serialize};

use super::config::EscalationConfig;
use super::rules::WindowSignals;

/// Community-facing urgency tier, ordered from quiet to confirmed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    #[default]
    None,
    Watch,
    Confirmed,
}

impl AlertLevel {
    pub const fn label(self) -> &'static str {
        match self {
            AlertLevel::None => "QUIET",
            AlertLevel::Watch => "WATCH",
            AlertLevel::Confirmed => "CONFIRMED",
        }
    }
}

const NO_ACTIVE_REPORTS: &str = "No active reports";

/// First matching rule wins; the level is recomputed from scratch each time.
pub(crate) fn decide_level(
    signals: &WindowSignals,
    config: &EscalationConfig,
) -> (AlertLevel, String) {
    if signals.total == 0 {
        return (AlertLevel::None, NO_ACTIVE_REPORTS.to_string());
    }

    if signals.verified_full_jubilee >= config.confirmed_verified_full_jubilee {
        return (
            AlertLevel::Confirmed,
            format!(
                "{} verified watchers reported full jubilee",
                signals.verified_full_jubilee
            ),
        );
    }

    if signals.full_jubilee >= config.confirmed_full_jubilee {
        return (
            AlertLevel::Confirmed,
            format!("{} users reported full jubilee", signals.full_jubilee),
        );
    }

    if signals.verified_watchers >= config.watch_verified_watchers {
        return (
            AlertLevel::Watch,
            "Verified watcher reported activity".to_string(),
        );
    }

    if signals.total >= config.watch_report_count {
        return (
            AlertLevel::Watch,
            format!("{} users reported activity", signals.total),
        );
    }

    (
        AlertLevel::None,
        "Reports below escalation threshold".to_string(),
    )
}
