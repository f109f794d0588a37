use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::domain::{Author, Report, ReportId, ReportType, METERS_PER_MILE};
use super::escalation::AlertLevel;

/// Reputation strictly above this marks a verified watcher.
pub const VERIFIED_WATCHER_REPUTATION: u8 = 70;

pub const WATCH_RADIUS_MILES: f64 = 5.0;

/// Stand-in radius meaning "every opted-in subscriber".
pub const BROADCAST_RADIUS_METERS: f64 = 999_999.0;

pub fn notification_radius_meters(level: AlertLevel) -> f64 {
    match level {
        AlertLevel::None => 0.0,
        AlertLevel::Watch => WATCH_RADIUS_MILES * METERS_PER_MILE,
        AlertLevel::Confirmed => BROADCAST_RADIUS_METERS,
    }
}

/// Reputation above 70, or the explicit flag (grandfathered accounts).
pub fn is_verified_watcher(author: &Author) -> bool {
    author.reputation > VERIFIED_WATCHER_REPUTATION || author.verified_watcher
}

/// Sightings and early warnings from verified watchers bypass escalation.
pub fn should_notify_immediately(report: &Report, author: &Author) -> bool {
    matches!(
        report.report_type,
        ReportType::FullJubilee | ReportType::EarlyWarning
    ) && is_verified_watcher(author)
}

/// Whether `subscriber` asked to hear about a condition score this high.
pub fn should_notify_for_score(subscriber: &Author, score: u32) -> bool {
    subscriber.notifications_enabled && score >= subscriber.notification_threshold
}

/// Outbound community alert handed to the dispatch collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityNotification {
    pub title: String,
    pub body: String,
    pub level: AlertLevel,
    pub report_id: ReportId,
    pub location_name: String,
    pub radius_meters: f64,
    pub issued_at: NaiveDateTime,
}

impl CommunityNotification {
    /// Builds the immediate alert for `report`. Immediate alerts are never
    /// quieter than WATCH even if the window has not escalated yet.
    pub fn immediate(report: &Report, level: AlertLevel, issued_at: NaiveDateTime) -> Self {
        let level = level.max(AlertLevel::Watch);
        let reporter = report
            .author
            .as_ref()
            .map(|author| author.display_name.as_str())
            .unwrap_or("A verified watcher");

        Self {
            title: format!("Jubilee {}: {}", level.label(), report.location_name),
            body: format!(
                "{reporter} reported {} at {}",
                report.report_type.label().to_lowercase(),
                report.location_name
            ),
            level,
            report_id: report.id.clone(),
            location_name: report.location_name.clone(),
            radius_meters: notification_radius_meters(level),
            issued_at,
        }
    }
}

/// Outbound condition-score alert for subscribers over their threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionScoreNotification {
    pub title: String,
    pub body: String,
    pub condition_score: u32,
    pub threshold: u32,
    pub issued_at: NaiveDateTime,
}

impl ConditionScoreNotification {
    /// `None` when `subscriber` would not want to hear about `score`.
    pub fn for_subscriber(
        subscriber: &Author,
        score: u32,
        issued_at: NaiveDateTime,
    ) -> Option<Self> {
        if !should_notify_for_score(subscriber, score) {
            return None;
        }

        Some(Self {
            title: "Jubilee conditions rising".to_string(),
            body: format!(
                "Condition score reached {score}/100 (your threshold is {})",
                subscriber.notification_threshold
            ),
            condition_score: score,
            threshold: subscriber.notification_threshold,
            issued_at,
        })
    }
}
