use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::community::domain::{
    Author, AuthorId, Coordinate, Report, ReportId, ReportIntensity, ReportSubmission, ReportType,
};
use crate::community::notification::CommunityNotification;
use crate::community::repository::{
    AlertPublisher, PublishError, ReportRepository, RepositoryError,
};
use crate::community::{community_router, CommunityAlertService, EscalationConfig};

pub(super) const POINT_CLEAR: Coordinate = Coordinate::new(30.4866, -87.9249);
pub(super) const BATTLES_WHARF: Coordinate = Coordinate::new(30.4921, -87.9156);
pub(super) const MULLET_POINT: Coordinate = Coordinate::new(30.4755, -87.9401);
pub(super) const DAPHNE: Coordinate = Coordinate::new(30.5234, -87.8812);

/// 2:30 AM on an August night.
pub(super) fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 8, 10)
        .expect("valid date")
        .and_hms_opt(2, 30, 0)
        .expect("valid time")
}

pub(super) fn minutes_ago(minutes: i64) -> NaiveDateTime {
    now() - Duration::minutes(minutes)
}

pub(super) fn author(id: &str, reputation: u8) -> Author {
    Author::new(id, format!("Watcher {id}")).with_reputation(reputation)
}

pub(super) fn report(
    id: &str,
    report_type: ReportType,
    age_minutes: i64,
    author: Option<Author>,
) -> Report {
    report_at(id, report_type, POINT_CLEAR, age_minutes, author)
}

pub(super) fn report_at(
    id: &str,
    report_type: ReportType,
    location: Coordinate,
    age_minutes: i64,
    author: Option<Author>,
) -> Report {
    let reported_at = minutes_ago(age_minutes);
    Report {
        id: ReportId(id.to_string()),
        report_type,
        location,
        location_name: "Point Clear".to_string(),
        species: vec!["Flounder".to_string(), "Blue Crab".to_string()],
        intensity: ReportIntensity::Heavy,
        description: None,
        photo_refs: Vec::new(),
        verifications: 0,
        verified: false,
        reported_at,
        created_at: reported_at,
        author,
    }
}

/// `count` anonymous full-jubilee reports spread over the last ten minutes.
pub(super) fn full_jubilee_reports(count: usize) -> Vec<Report> {
    (0..count)
        .map(|index| {
            report(
                &format!("fj-{index}"),
                ReportType::FullJubilee,
                (index as i64 * 2) % 10,
                None,
            )
        })
        .collect()
}

pub(super) fn submission(
    id: &str,
    report_type: ReportType,
    author_id: Option<&str>,
) -> ReportSubmission {
    ReportSubmission {
        id: ReportId(id.to_string()),
        report_type,
        location: POINT_CLEAR,
        location_name: "Point Clear".to_string(),
        species: vec!["Shrimp".to_string()],
        intensity: ReportIntensity::Moderate,
        description: Some("Crabs stacking up on the pilings".to_string()),
        photo_refs: Vec::new(),
        author_id: author_id.map(|id| AuthorId(id.to_string())),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    reports: Arc<Mutex<Vec<Report>>>,
    authors: Arc<Mutex<HashMap<AuthorId, Author>>>,
}

impl MemoryRepository {
    pub(super) fn with_authors(authors: Vec<Author>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.authors.lock().expect("author mutex poisoned");
            for author in authors {
                guard.insert(author.id.clone(), author);
            }
        }
        repository
    }
}

impl ReportRepository for MemoryRepository {
    fn insert(&self, report: Report) -> Result<Report, RepositoryError> {
        let mut guard = self.reports.lock().expect("report mutex poisoned");
        if guard.iter().any(|existing| existing.id == report.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(report.clone());
        Ok(report)
    }

    fn modify(
        &self,
        id: &ReportId,
        change: &mut dyn FnMut(&mut Report),
    ) -> Result<Report, RepositoryError> {
        let mut guard = self.reports.lock().expect("report mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| &existing.id == id)
            .ok_or(RepositoryError::NotFound)?;
        change(slot);
        Ok(slot.clone())
    }

    fn fetch(&self, id: &ReportId) -> Result<Option<Report>, RepositoryError> {
        let guard = self.reports.lock().expect("report mutex poisoned");
        Ok(guard.iter().find(|report| &report.id == id).cloned())
    }

    fn all(&self) -> Result<Vec<Report>, RepositoryError> {
        Ok(self.reports.lock().expect("report mutex poisoned").clone())
    }

    fn author(&self, id: &AuthorId) -> Result<Option<Author>, RepositoryError> {
        let guard = self.authors.lock().expect("author mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn save_author(&self, author: Author) -> Result<(), RepositoryError> {
        let mut guard = self.authors.lock().expect("author mutex poisoned");
        guard.insert(author.id.clone(), author);
        Ok(())
    }

    fn modify_author(
        &self,
        id: &AuthorId,
        change: &mut dyn FnMut(&mut Author),
    ) -> Result<Author, RepositoryError> {
        let mut guard = self.authors.lock().expect("author mutex poisoned");
        let author = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        change(author);
        Ok(author.clone())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryPublisher {
    events: Arc<Mutex<Vec<CommunityNotification>>>,
}

impl MemoryPublisher {
    pub(super) fn events(&self) -> Vec<CommunityNotification> {
        self.events.lock().expect("publisher mutex poisoned").clone()
    }
}

impl AlertPublisher for MemoryPublisher {
    fn publish(&self, notification: CommunityNotification) -> Result<(), PublishError> {
        self.events
            .lock()
            .expect("publisher mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct OfflinePublisher;

impl AlertPublisher for OfflinePublisher {
    fn publish(&self, _notification: CommunityNotification) -> Result<(), PublishError> {
        Err(PublishError::Transport("push gateway offline".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl ReportRepository for UnavailableRepository {
    fn insert(&self, _report: Report) -> Result<Report, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn modify(
        &self,
        _id: &ReportId,
        _change: &mut dyn FnMut(&mut Report),
    ) -> Result<Report, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ReportId) -> Result<Option<Report>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<Report>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn author(&self, _id: &AuthorId) -> Result<Option<Author>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save_author(&self, _author: Author) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn modify_author(
        &self,
        _id: &AuthorId,
        _change: &mut dyn FnMut(&mut Author),
    ) -> Result<Author, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn watchers() -> Vec<Author> {
    vec![
        author("veteran", 82),
        author("regular", 72),
        author("newcomer", 40),
        Author {
            verified_watcher: true,
            ..author("grandfathered", 55)
        },
    ]
}

pub(super) fn build_service() -> (
    CommunityAlertService<MemoryRepository, MemoryPublisher>,
    Arc<MemoryRepository>,
    Arc<MemoryPublisher>,
) {
    let repository = Arc::new(MemoryRepository::with_authors(watchers()));
    let publisher = Arc::new(MemoryPublisher::default());
    let service = CommunityAlertService::new(
        repository.clone(),
        publisher.clone(),
        EscalationConfig::default(),
    )
    .with_clock(now);
    (service, repository, publisher)
}

pub(super) fn router_with_service(
    service: CommunityAlertService<MemoryRepository, MemoryPublisher>,
) -> axum::Router {
    community_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
