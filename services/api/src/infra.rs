use chrono::NaiveDateTime;
use jubilee::community::{
    AlertLevel, AlertPublisher, Author, AuthorId, CommunityNotification, Coordinate,
    PublishError, Report, ReportId, ReportRepository, RepositoryError,
};
use jubilee::conditions::{TidePhase, WeatherPattern};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Named shoreline spots along the eastern shore of Mobile Bay.
pub(crate) const BAY_LOCATIONS: [(&str, Coordinate); 5] = [
    ("Point Clear", Coordinate::new(30.4866, -87.9249)),
    ("Fairhope Pier", Coordinate::new(30.5051, -87.8964)),
    ("Daphne", Coordinate::new(30.5234, -87.8812)),
    ("Battles Wharf", Coordinate::new(30.4921, -87.9156)),
    ("Mullet Point", Coordinate::new(30.4755, -87.9401)),
];

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryReportRepository {
    reports: Arc<Mutex<Vec<Report>>>,
    authors: Arc<Mutex<HashMap<AuthorId, Author>>>,
}

impl InMemoryReportRepository {
    pub(crate) fn seeded(authors: Vec<Author>) -> Self {
        let repository = Self::default();
        if let Ok(mut guard) = repository.authors.lock() {
            for author in authors {
                guard.insert(author.id.clone(), author);
            }
        }
        repository
    }
}

impl ReportRepository for InMemoryReportRepository {
    fn insert(&self, report: Report) -> Result<Report, RepositoryError> {
        let mut guard = lock(&self.reports)?;
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
        let mut guard = lock(&self.reports)?;
        let slot = guard
            .iter_mut()
            .find(|existing| &existing.id == id)
            .ok_or(RepositoryError::NotFound)?;
        change(slot);
        Ok(slot.clone())
    }

    fn fetch(&self, id: &ReportId) -> Result<Option<Report>, RepositoryError> {
        let guard = lock(&self.reports)?;
        Ok(guard.iter().find(|report| &report.id == id).cloned())
    }

    fn all(&self) -> Result<Vec<Report>, RepositoryError> {
        Ok(lock(&self.reports)?.clone())
    }

    fn author(&self, id: &AuthorId) -> Result<Option<Author>, RepositoryError> {
        Ok(lock(&self.authors)?.get(id).cloned())
    }

    fn save_author(&self, author: Author) -> Result<(), RepositoryError> {
        lock(&self.authors)?.insert(author.id.clone(), author);
        Ok(())
    }

    fn modify_author(
        &self,
        id: &AuthorId,
        change: &mut dyn FnMut(&mut Author),
    ) -> Result<Author, RepositoryError> {
        let mut guard = lock(&self.authors)?;
        let author = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        change(author);
        Ok(author.clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAlertPublisher {
    events: Arc<Mutex<Vec<CommunityNotification>>>,
}

impl AlertPublisher for InMemoryAlertPublisher {
    fn publish(&self, notification: CommunityNotification) -> Result<(), PublishError> {
        let mut guard = self
            .events
            .lock()
            .map_err(|_| PublishError::Transport("outbox lock poisoned".to_string()))?;
        info!(
            report_id = %notification.report_id,
            level = notification.level.label(),
            radius_m = notification.radius_meters,
            "community alert queued"
        );
        guard.push(notification);
        Ok(())
    }
}

impl InMemoryAlertPublisher {
    pub(crate) fn events(&self) -> Vec<CommunityNotification> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

/// Members the in-memory store starts with.
pub(crate) fn seed_authors() -> Vec<Author> {
    vec![
        Author::new("captain-lou", "Captain Lou").with_reputation(92),
        Author::new("marsha", "Marsha from Point Clear").with_reputation(78),
        Author::new("tim-f", "Tim F.").with_reputation(73),
        Author::new("newbie", "Bay Newbie").with_reputation(35),
        Author {
            verified_watcher: true,
            ..Author::new("old-timer", "Old Timer").with_reputation(64)
        },
    ]
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub(crate) fn parse_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    let trimmed = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| format!("failed to parse '{raw}' as YYYY-MM-DDTHH:MM[:SS]"))
}

pub(crate) fn parse_tide(raw: &str) -> Result<TidePhase, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "rising" => Ok(TidePhase::Rising),
        "high" => Ok(TidePhase::High),
        "falling" => Ok(TidePhase::Falling),
        "low" => Ok(TidePhase::Low),
        other => Err(format!(
            "unknown tide phase '{other}' (expected rising, high, falling or low)"
        )),
    }
}

pub(crate) fn parse_weather(raw: &str) -> Result<WeatherPattern, String> {
    let normalized = raw
        .trim()
        .to_ascii_lowercase()
        .replace(|c: char| c == '-' || c == ' ', "_");
    match normalized.as_str() {
        "clear" => Ok(WeatherPattern::Clear),
        "partly_cloudy" => Ok(WeatherPattern::PartlyCloudy),
        "overcast" => Ok(WeatherPattern::Overcast),
        "overcast_with_rain" | "rain" => Ok(WeatherPattern::OvercastWithRain),
        other => Err(format!("unknown weather pattern '{other}'")),
    }
}

pub(crate) fn parse_alert_level(raw: &str) -> Result<AlertLevel, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "none" | "quiet" => Ok(AlertLevel::None),
        "watch" => Ok(AlertLevel::Watch),
        "confirmed" => Ok(AlertLevel::Confirmed),
        other => Err(format!(
            "unknown alert level '{other}' (expected quiet, watch or confirmed)"
        )),
    }
}

pub(crate) fn deserialize_optional_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_datetime(&value).map_err(serde::de::Error::custom))
        .transpose()
}
