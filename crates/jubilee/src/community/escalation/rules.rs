use chrono::{Duration, NaiveDateTime};

use super::super::domain::{Coordinate, Report, ReportType};
use super::config::EscalationConfig;

/// Aggregates over the reports inside the evaluation window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct WindowSignals {
    pub total: usize,
    pub verified_watchers: usize,
    pub full_jubilee: usize,
    pub verified_full_jubilee: usize,
    pub nearby: usize,
}

/// Inclusive: a report exactly `report_window_minutes` old still counts.
///
/// A window too large for chrono to represent admits every report.
pub(crate) fn in_window(report: &Report, now: NaiveDateTime, config: &EscalationConfig) -> bool {
    match Duration::try_minutes(config.report_window_minutes) {
        Some(window) => now.signed_duration_since(report.reported_at) <= window,
        None => true,
    }
}

/// Reputation only; the explicit verified-watcher flag does not count here.
pub(crate) fn counts_as_verified(report: &Report, config: &EscalationConfig) -> bool {
    report
        .author_reputation()
        .map(|reputation| reputation > config.verified_watcher_threshold)
        .unwrap_or(false)
}

pub(crate) fn within_radius(
    center: &Coordinate,
    report: &Report,
    config: &EscalationConfig,
) -> bool {
    center.distance_miles(&report.location) <= config.cluster_radius_miles
}

pub(crate) fn collect_signals(
    recent: &[&Report],
    reference: Option<&Coordinate>,
    config: &EscalationConfig,
) -> WindowSignals {
    let mut signals = WindowSignals {
        total: recent.len(),
        ..WindowSignals::default()
    };

    for report in recent {
        let verified = counts_as_verified(report, config);
        let full_jubilee = report.report_type == ReportType::FullJubilee;

        if verified {
            signals.verified_watchers += 1;
        }
        if full_jubilee {
            signals.full_jubilee += 1;
        }
        if verified && full_jubilee {
            signals.verified_full_jubilee += 1;
        }
        if let Some(center) = reference {
            if within_radius(center, report, config) {
                signals.nearby += 1;
            }
        }
    }

    signals
}
