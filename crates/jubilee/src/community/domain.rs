use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::reputation::{self, ReputationUpdate, DEFAULT_REPUTATION, MAX_REPUTATION};

/// Mean Earth radius used for great-circle distances, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

pub const METERS_PER_MILE: f64 = 1609.34;

/// Condition score at which subscribers are notified unless they pick their own.
pub const DEFAULT_NOTIFICATION_THRESHOLD: u32 = 70;

/// Client-supplied report identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReportId(pub String);

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AuthorId(pub String);

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    FullJubilee,
    EarlyWarning,
    AllClear,
}

impl ReportType {
    pub const fn label(self) -> &'static str {
        match self {
            ReportType::FullJubilee => "Full Jubilee",
            ReportType::EarlyWarning => "Early Warning",
            ReportType::AllClear => "All Clear",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportIntensity {
    Low,
    #[default]
    Moderate,
    Heavy,
    Extreme,
}

impl ReportIntensity {
    pub const fn ordinal(self) -> u8 {
        match self {
            ReportIntensity::Low => 1,
            ReportIntensity::Moderate => 2,
            ReportIntensity::Heavy => 3,
            ReportIntensity::Extreme => 4,
        }
    }
}

/// WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Haversine distance to `other`.
    pub fn distance_meters(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_METERS * c
    }

    pub fn distance_miles(&self, other: &Coordinate) -> f64 {
        self.distance_meters(other) / METERS_PER_MILE
    }
}

fn default_reputation() -> u8 {
    DEFAULT_REPUTATION
}

fn default_notification_threshold() -> u32 {
    DEFAULT_NOTIFICATION_THRESHOLD
}

fn default_true() -> bool {
    true
}

/// Community member who submits and verifies reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub display_name: String,
    /// Trust score, always within 0-100.
    #[serde(default = "default_reputation")]
    pub reputation: u8,
    /// Sticky flag; once granted it is never cleared by reputation changes.
    #[serde(default)]
    pub verified_watcher: bool,
    #[serde(default = "default_notification_threshold")]
    pub notification_threshold: u32,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
}

impl Author {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: AuthorId(id.into()),
            display_name: display_name.into(),
            reputation: DEFAULT_REPUTATION,
            verified_watcher: false,
            notification_threshold: DEFAULT_NOTIFICATION_THRESHOLD,
            notifications_enabled: true,
        }
    }

    pub fn with_reputation(mut self, reputation: u8) -> Self {
        self.reputation = reputation.min(MAX_REPUTATION);
        self
    }

    /// Applies `delta`, clamps, and grants the verified-watcher flag at 75+.
    pub fn apply_reputation_delta(&mut self, delta: i32) -> ReputationUpdate {
        let previous = self.reputation;
        self.reputation = reputation::apply_delta(previous, delta);

        let promoted = !self.verified_watcher
            && reputation::qualifies_for_verified_watcher(self.reputation);
        if promoted {
            self.verified_watcher = true;
        }

        ReputationUpdate {
            author_id: self.id.clone(),
            previous,
            delta,
            reputation: self.reputation,
            verified_watcher: self.verified_watcher,
            promoted,
        }
    }
}

/// Community sighting as stored and fed to the alert engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub report_type: ReportType,
    pub location: Coordinate,
    pub location_name: String,
    #[serde(default)]
    pub species: Vec<String>,
    #[serde(default)]
    pub intensity: ReportIntensity,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub photo_refs: Vec<String>,
    /// Confirmations minus disputes.
    #[serde(default)]
    pub verifications: i32,
    #[serde(default)]
    pub verified: bool,
    pub reported_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    /// Resolved author snapshot; `None` counts as an unverified reporter.
    #[serde(default)]
    pub author: Option<Author>,
}

impl Report {
    pub fn verification_status(&self) -> VerificationStatus {
        VerificationStatus::from_net(self.verifications)
    }

    pub fn author_reputation(&self) -> Option<u8> {
        self.author.as_ref().map(|author| author.reputation)
    }
}

/// Payload accepted from clients; the server stamps the timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSubmission {
    pub id: ReportId,
    pub report_type: ReportType,
    pub location: Coordinate,
    pub location_name: String,
    #[serde(default)]
    pub species: Vec<String>,
    #[serde(default)]
    pub intensity: ReportIntensity,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub photo_refs: Vec<String>,
    #[serde(default)]
    pub author_id: Option<AuthorId>,
}

impl ReportSubmission {
    pub fn into_report(self, author: Option<Author>, now: NaiveDateTime) -> Report {
        Report {
            id: self.id,
            report_type: self.report_type,
            location: self.location,
            location_name: self.location_name,
            species: self.species,
            intensity: self.intensity,
            description: self.description,
            photo_refs: self.photo_refs,
            verifications: 0,
            verified: false,
            reported_at: now,
            created_at: now,
            author,
        }
    }
}

/// Community trust in a report, derived from its net verification count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Disputed,
    Unverified,
    Trusted,
    HighlyTrusted,
}

impl VerificationStatus {
    pub const fn from_net(net: i32) -> Self {
        if net >= 5 {
            VerificationStatus::HighlyTrusted
        } else if net >= 2 {
            VerificationStatus::Trusted
        } else if net >= 0 {
            VerificationStatus::Unverified
        } else {
            VerificationStatus::Disputed
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            VerificationStatus::Disputed => "Disputed",
            VerificationStatus::Unverified => "Unverified",
            VerificationStatus::Trusted => "Trusted",
            VerificationStatus::HighlyTrusted => "Highly Trusted",
        }
    }
}

/// A community member's judgement on someone else's report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vote {
    Confirm,
    Dispute,
}

impl Vote {
    pub const fn weight(self) -> i32 {
        match self {
            Vote::Confirm => 1,
            Vote::Dispute => -1,
        }
    }
}
