//! Condition score engine.
//!
//! Turns an [`EnvironmentalReading`] into a deterministic 0-100 favorability
//! score. Three hard gates (season, time of night, wind direction) zero the
//! score outright; otherwise seven weighted components are summed and capped.

pub mod domain;
mod gates;
mod rules;
pub mod samples;

#[cfg(test)]
mod tests;

pub use domain::{
    ConditionLevel, ConditionScore, EnvironmentalReading, GateFailure, ReadingSnapshot,
    ScoreBreakdown, TidePhase, WeatherPattern, DEFAULT_AIR_TEMPERATURE_C,
};
pub use gates::{normalize_direction, WindSector};

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::community::AlertLevel;

/// Upper bound of the total score.
pub const MAX_SCORE: u32 = 100;

/// Stateless evaluator; cheap to copy into handlers and worker threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreEngine;

impl ScoreEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, reading: &EnvironmentalReading, now: NaiveDateTime) -> ConditionScore {
        compute_score(reading, now)
    }
}

/// Scores `reading` as of `now`, read on the local (naive) clock of the bay.
///
/// Never fails: missing optional inputs contribute their defaults and
/// out-of-range values fall through to the nearest rule branch.
pub fn compute_score(reading: &EnvironmentalReading, now: NaiveDateTime) -> ConditionScore {
    let month = now.month();
    let hour = now.hour();
    let sector = WindSector::classify(&normalize_direction(&reading.wind_direction));

    let (components, gate) = match gates::check_gates(month, hour, sector) {
        Ok(()) => (rules::score_components(reading, month, hour, sector), None),
        Err(failure) => (ScoreBreakdown::default(), Some(failure)),
    };

    ConditionScore {
        total: components.sum().min(MAX_SCORE),
        components,
        gate,
        readings: ReadingSnapshot::from(reading),
        alert_level: AlertLevel::None,
        evaluated_at: now,
    }
}
