use serde::{Deserialize, Serialize};

/// Longest accepted report window: one week.
pub const MAX_REPORT_WINDOW_MINUTES: i64 = 7 * 24 * 60;

/// Thresholds driving community alert escalation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    /// Reports older than this (inclusive bound) are ignored.
    pub report_window_minutes: i64,
    /// Authors strictly above this reputation count as verified watchers.
    pub verified_watcher_threshold: u8,
    pub cluster_radius_miles: f64,
    pub confirmed_verified_full_jubilee: usize,
    pub confirmed_full_jubilee: usize,
    pub watch_verified_watchers: usize,
    pub watch_report_count: usize,
    pub min_cluster_size: usize,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            report_window_minutes: 30,
            verified_watcher_threshold: 70,
            cluster_radius_miles: 2.0,
            confirmed_verified_full_jubilee: 2,
            confirmed_full_jubilee: 5,
            watch_verified_watchers: 1,
            watch_report_count: 3,
            min_cluster_size: 2,
        }
    }
}

impl EscalationConfig {
    /// Name of the first field outside its accepted range, if any.
    pub fn out_of_range_field(&self) -> Option<&'static str> {
        if !(1..=MAX_REPORT_WINDOW_MINUTES).contains(&self.report_window_minutes) {
            return Some("report_window_minutes");
        }
        if !self.cluster_radius_miles.is_finite() || self.cluster_radius_miles < 0.0 {
            return Some("cluster_radius_miles");
        }
        None
    }
}
