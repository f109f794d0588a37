mod config;
mod policy;
mod rules;

pub use config::{EscalationConfig, MAX_REPORT_WINDOW_MINUTES};
pub use policy::AlertLevel;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::domain::{Coordinate, Report};
use policy::decide_level;

/// Stateless evaluator turning a report stream into a community alert level.
#[derive(Debug, Clone, Default)]
pub struct AlertEngine {
    config: EscalationConfig,
}

impl AlertEngine {
    pub fn new(config: EscalationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EscalationConfig {
        &self.config
    }

    /// Evaluates every report supplied; window filtering happens here, so
    /// callers should pass the full set rather than a pre-filtered one.
    pub fn evaluate(
        &self,
        reports: &[Report],
        now: NaiveDateTime,
        reference: Option<Coordinate>,
    ) -> AlertResult {
        let recent = self.recent_reports(reports, now);
        let signals = rules::collect_signals(&recent, reference.as_ref(), &self.config);
        let (level, primary_reason) = decide_level(&signals, &self.config);

        AlertResult {
            level,
            verified_watcher_count: signals.verified_watchers,
            total_report_count: signals.total,
            full_jubilee_report_count: signals.full_jubilee,
            nearby_report_count: signals.nearby,
            primary_reason,
        }
    }

    pub fn recent_reports<'a>(
        &self,
        reports: &'a [Report],
        now: NaiveDateTime,
    ) -> Vec<&'a Report> {
        reports
            .iter()
            .filter(|report| rules::in_window(report, now, &self.config))
            .collect()
    }

    /// True when at least `min_cluster_size` of `reports` lie within the
    /// cluster radius of `location`. No time filtering is applied; pass the
    /// output of [`AlertEngine::recent_reports`] for a live view.
    pub fn has_clustering<'a, I>(
        &self,
        location: &Coordinate,
        reports: I,
        min_cluster_size: usize,
    ) -> bool
    where
        I: IntoIterator<Item = &'a Report>,
    {
        reports
            .into_iter()
            .filter(|report| rules::within_radius(location, report, &self.config))
            .count()
            >= min_cluster_size
    }

    /// [`AlertEngine::has_clustering`] with the configured minimum cluster size.
    pub fn has_default_clustering<'a, I>(&self, location: &Coordinate, reports: I) -> bool
    where
        I: IntoIterator<Item = &'a Report>,
    {
        self.has_clustering(location, reports, self.config.min_cluster_size)
    }
}

/// Alert level plus the counts it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertResult {
    pub level: AlertLevel,
    pub verified_watcher_count: usize,
    pub total_report_count: usize,
    pub full_jubilee_report_count: usize,
    /// Zero when no reference location was supplied.
    pub nearby_report_count: usize,
    pub primary_reason: String,
}

impl AlertResult {
    pub fn summary(&self) -> String {
        match self.level {
            AlertLevel::None => format!("Quiet - {}", self.primary_reason),
            AlertLevel::Watch => format!("WATCH - {}", self.primary_reason),
            AlertLevel::Confirmed => format!("CONFIRMED - {}", self.primary_reason),
        }
    }
}
