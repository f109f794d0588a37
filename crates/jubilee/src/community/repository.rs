use serde::Serialize;

use super::domain::{Author, AuthorId, Report, ReportId, VerificationStatus};
use super::notification::CommunityNotification;

/// Report and reputation store so the service can run against any backend.
pub trait ReportRepository: Send + Sync {
    fn insert(&self, report: Report) -> Result<Report, RepositoryError>;
    /// Applies `change` to the stored report while holding the store's write
    /// guard and returns the result. `NotFound` when `id` is unknown.
    fn modify(
        &self,
        id: &ReportId,
        change: &mut dyn FnMut(&mut Report),
    ) -> Result<Report, RepositoryError>;
    fn fetch(&self, id: &ReportId) -> Result<Option<Report>, RepositoryError>;
    /// Every stored report, oldest first.
    fn all(&self) -> Result<Vec<Report>, RepositoryError>;
    fn author(&self, id: &AuthorId) -> Result<Option<Author>, RepositoryError>;
    fn save_author(&self, author: Author) -> Result<(), RepositoryError>;
    /// Author counterpart of [`ReportRepository::modify`].
    fn modify_author(
        &self,
        id: &AuthorId,
        change: &mut dyn FnMut(&mut Author),
    ) -> Result<Author, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound push hook (FCM, APNs, e-mail adapters).
pub trait AlertPublisher: Send + Sync {
    fn publish(&self, notification: CommunityNotification) -> Result<(), PublishError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Public view of a stored report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    pub report: Report,
    pub verification_status: VerificationStatus,
    pub status_label: &'static str,
    pub intensity_level: u8,
}

impl From<Report> for ReportView {
    fn from(report: Report) -> Self {
        let verification_status = report.verification_status();
        Self {
            intensity_level: report.intensity.ordinal(),
            status_label: verification_status.label(),
            verification_status,
            report,
        }
    }
}
