//! Community reports, alert escalation and reputation.
//!
//! The [`AlertEngine`] derives a QUIET/WATCH/CONFIRMED level from the reports
//! of the last 30 minutes. Reputation rules adjust author trust after reports
//! are resolved, and that trust feeds back into later evaluations through the
//! [`CommunityAlertService`], which owns all storage and publishing.

pub mod domain;
pub mod escalation;
pub mod notification;
pub mod repository;
pub mod reputation;
pub mod router;
pub mod service;
pub mod transition;

#[cfg(test)]
mod tests;

pub use domain::{
    Author, AuthorId, Coordinate, Report, ReportId, ReportIntensity, ReportSubmission, ReportType,
    VerificationStatus, Vote,
};
pub use escalation::{
    AlertEngine, AlertLevel, AlertResult, EscalationConfig, MAX_REPORT_WINDOW_MINUTES,
};
pub use notification::{
    is_verified_watcher, notification_radius_meters, should_notify_for_score,
    should_notify_immediately, CommunityNotification, ConditionScoreNotification,
};
pub use repository::{
    AlertPublisher, PublishError, ReportRepository, ReportView, RepositoryError,
};
pub use reputation::{
    apply_delta, qualifies_for_verified_watcher, report_outcome_delta, ReputationBadge,
    ReputationUpdate, VerificationTally,
};
pub use router::community_router;
pub use service::{CommunityAlertService, CommunityServiceError, SubmissionReceipt};
pub use transition::{step_toward, AlertTransition};
