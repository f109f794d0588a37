//! Reputation rules.
//!
//! Two independent policies produce deltas: [`report_outcome_delta`] scores
//! the resolution of a single report by its type, while
//! [`VerificationTally::delta`] scores aggregate confirmation, dispute and
//! moderator signals. Both feed [`apply_delta`], which clamps to 0-100.

use serde::{Deserialize, Serialize};

use super::domain::{AuthorId, ReportType};

pub const MAX_REPUTATION: u8 = 100;

/// Reputation given to new members.
pub const DEFAULT_REPUTATION: u8 = 50;

/// Reputation at which the sticky verified-watcher flag is granted.
pub const VERIFIED_WATCHER_PROMOTION: u8 = 75;

/// Delta for a resolved report: rewards are larger for higher-stakes types.
pub const fn report_outcome_delta(report_type: ReportType, verified: bool) -> i32 {
    match (report_type, verified) {
        (ReportType::FullJubilee, true) => 5,
        (ReportType::FullJubilee, false) => -3,
        (ReportType::EarlyWarning, true) => 3,
        (ReportType::EarlyWarning, false) => -1,
        (ReportType::AllClear, true) => 1,
        (ReportType::AllClear, false) => -1,
    }
}

/// Aggregate community feedback on an author's report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationTally {
    #[serde(default)]
    pub verifications: u32,
    #[serde(default)]
    pub disputes: u32,
    #[serde(default)]
    pub moderator_flagged: bool,
}

impl VerificationTally {
    /// Sum of the confirmation, dispute and moderator components.
    ///
    /// Disputes cost at most 3 regardless of how many were cast.
    pub const fn delta(&self) -> i32 {
        let confirmation = if self.verifications >= 3 {
            5
        } else if self.verifications >= 1 {
            2
        } else {
            0
        };
        let dispute = if self.disputes >= 3 { -3 } else { 0 };
        let moderator = if self.moderator_flagged { -10 } else { 0 };

        confirmation + dispute + moderator
    }
}

pub fn apply_delta(current: u8, delta: i32) -> u8 {
    let next = (i32::from(current) + delta).clamp(0, i32::from(MAX_REPUTATION));
    u8::try_from(next).unwrap_or(MAX_REPUTATION)
}

pub const fn qualifies_for_verified_watcher(reputation: u8) -> bool {
    reputation >= VERIFIED_WATCHER_PROMOTION
}

/// Result of applying a delta to an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationUpdate {
    pub author_id: AuthorId,
    pub previous: u8,
    pub delta: i32,
    pub reputation: u8,
    pub verified_watcher: bool,
    /// True only on the update that granted the verified-watcher flag.
    pub promoted: bool,
}

impl ReputationUpdate {
    pub fn badge(&self) -> ReputationBadge {
        ReputationBadge::for_reputation(self.reputation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReputationBadge {
    NoviceWatcher,
    Contributor,
    ExperiencedWatcher,
    VerifiedWatcher,
    MasterWatcher,
}

impl ReputationBadge {
    pub const fn for_reputation(reputation: u8) -> Self {
        match reputation {
            0..=24 => ReputationBadge::NoviceWatcher,
            25..=49 => ReputationBadge::Contributor,
            50..=69 => ReputationBadge::ExperiencedWatcher,
            70..=89 => ReputationBadge::VerifiedWatcher,
            _ => ReputationBadge::MasterWatcher,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ReputationBadge::NoviceWatcher => "Novice Watcher",
            ReputationBadge::Contributor => "Contributor",
            ReputationBadge::ExperiencedWatcher => "Experienced Watcher",
            ReputationBadge::VerifiedWatcher => "Verified Watcher",
            ReputationBadge::MasterWatcher => "Master Watcher",
        }
    }
}
