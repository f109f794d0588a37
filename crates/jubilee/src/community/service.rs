use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info};

use super::domain::{AuthorId, Coordinate, Report, ReportId, ReportSubmission, Vote};
use super::escalation::{AlertEngine, AlertResult, EscalationConfig};
use super::notification::{should_notify_immediately, CommunityNotification};
use super::reputation::{report_outcome_delta, ReputationUpdate, VerificationTally};
use super::repository::{AlertPublisher, PublishError, ReportRepository, RepositoryError};

/// Source of the service's notion of "now" on the bay's local clock.
pub type Clock = fn() -> NaiveDateTime;

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Service composing the report store, the alert engine and the publisher.
pub struct CommunityAlertService<R, P> {
    repository: Arc<R>,
    publisher: Arc<P>,
    engine: Arc<AlertEngine>,
    clock: Clock,
}

/// Outcome of a submission: the stored report and the alert it produced.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub report: Report,
    pub alert: AlertResult,
    pub notified: bool,
}

impl<R, P> CommunityAlertService<R, P>
where
    R: ReportRepository + 'static,
    P: AlertPublisher + 'static,
{
    pub fn new(repository: Arc<R>, publisher: Arc<P>, config: EscalationConfig) -> Self {
        Self {
            repository,
            publisher,
            engine: Arc::new(AlertEngine::new(config)),
            clock: local_now,
        }
    }

    /// Replaces the wall clock used by [`CommunityAlertService::now`].
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    pub fn engine(&self) -> &AlertEngine {
        &self.engine
    }

    /// Store a new report stamped at `now` and re-evaluate the window.
    pub fn submit(
        &self,
        submission: ReportSubmission,
        now: NaiveDateTime,
    ) -> Result<SubmissionReceipt, CommunityServiceError> {
        let author = match &submission.author_id {
            Some(author_id) => {
                let author = self.repository.author(author_id)?;
                Some(author.ok_or_else(|| {
                    CommunityServiceError::MissingAuthor(submission.id.clone())
                })?)
            }
            None => None,
        };

        let report = self.repository.insert(submission.into_report(author, now))?;
        debug!(report_id = %report.id, report_type = ?report.report_type, "report stored");

        let alert = self.current_alert(now, None)?;

        let notified = match &report.author {
            Some(author) if should_notify_immediately(&report, author) => {
                let notification = CommunityNotification::immediate(&report, alert.level, now);
                self.publisher.publish(notification)?;
                info!(report_id = %report.id, author = %author.id, "immediate alert published");
                true
            }
            _ => false,
        };

        Ok(SubmissionReceipt {
            report,
            alert,
            notified,
        })
    }

    /// Evaluate every stored report with author reputations re-read from the store.
    pub fn current_alert(
        &self,
        now: NaiveDateTime,
        reference: Option<Coordinate>,
    ) -> Result<AlertResult, CommunityServiceError> {
        let mut reports = self.repository.all()?;
        let mut authors = HashMap::new();

        for report in reports.iter_mut() {
            let Some(snapshot) = report.author.as_ref() else {
                continue;
            };
            let author_id = snapshot.id.clone();
            if !authors.contains_key(&author_id) {
                let fresh = self.repository.author(&author_id)?;
                authors.insert(author_id.clone(), fresh);
            }
            if let Some(Some(fresh)) = authors.get(&author_id) {
                report.author = Some(fresh.clone());
            }
        }

        let result = self.engine.evaluate(&reports, now, reference);
        debug!(
            level = result.level.label(),
            total = result.total_report_count,
            "alert level evaluated"
        );
        Ok(result)
    }

    /// Every stored report, oldest first, with the author snapshot taken at submission.
    pub fn reports(&self) -> Result<Vec<Report>, CommunityServiceError> {
        Ok(self.repository.all()?)
    }

    pub fn get(&self, report_id: &ReportId) -> Result<Report, CommunityServiceError> {
        self.repository
            .fetch(report_id)?
            .ok_or_else(|| CommunityServiceError::UnknownReport(report_id.clone()))
    }

    /// Record a community confirmation or dispute against a report.
    ///
    /// The increment happens inside the store, so concurrent votes all land.
    pub fn vote(
        &self,
        report_id: &ReportId,
        vote: Vote,
    ) -> Result<Report, CommunityServiceError> {
        let report = self
            .repository
            .modify(report_id, &mut |report| report.verifications += vote.weight())
            .map_err(|error| match error {
                RepositoryError::NotFound => {
                    CommunityServiceError::UnknownReport(report_id.clone())
                }
                other => other.into(),
            })?;
        debug!(report_id = %report_id, net = report.verifications, "vote recorded");
        Ok(report)
    }

    /// Settle a report and move its author's reputation accordingly.
    ///
    /// Only `verified` and the author snapshot are written back to the report;
    /// votes recorded meanwhile are preserved.
    pub fn resolve(
        &self,
        report_id: &ReportId,
        verified: bool,
    ) -> Result<ReputationUpdate, CommunityServiceError> {
        let report = self.get(report_id)?;
        let author_id = report
            .author
            .as_ref()
            .map(|author| author.id.clone())
            .ok_or_else(|| CommunityServiceError::MissingAuthor(report_id.clone()))?;

        let delta = report_outcome_delta(report.report_type, verified);
        let mut update = None;
        let author = self
            .repository
            .modify_author(&author_id, &mut |author| {
                update = Some(author.apply_reputation_delta(delta));
            })
            .map_err(|error| match error {
                RepositoryError::NotFound => {
                    CommunityServiceError::MissingAuthor(report_id.clone())
                }
                other => other.into(),
            })?;
        let update =
            update.ok_or_else(|| CommunityServiceError::MissingAuthor(report_id.clone()))?;

        self.repository.modify(report_id, &mut |stored| {
            stored.verified = verified;
            stored.author = Some(author.clone());
        })?;

        log_update(&update, "report resolved");
        Ok(update)
    }

    /// Apply the aggregate verification policy to an author.
    pub fn apply_tally(
        &self,
        author_id: &AuthorId,
        tally: VerificationTally,
    ) -> Result<ReputationUpdate, CommunityServiceError> {
        let delta = tally.delta();
        let mut update = None;
        self.repository.modify_author(author_id, &mut |author| {
            update = Some(author.apply_reputation_delta(delta));
        })?;
        let update = update.ok_or(RepositoryError::NotFound)?;

        log_update(&update, "verification tally applied");
        Ok(update)
    }
}

fn log_update(update: &ReputationUpdate, message: &str) {
    if update.promoted {
        info!(
            author = %update.author_id,
            reputation = update.reputation,
            "{message}; verified watcher granted"
        );
    } else {
        debug!(
            author = %update.author_id,
            delta = update.delta,
            reputation = update.reputation,
            "{message}"
        );
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommunityServiceError {
    #[error("report {0} not found")]
    UnknownReport(ReportId),
    #[error("report {0} has no known author")]
    MissingAuthor(ReportId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Publish(#[from] PublishError),
}
