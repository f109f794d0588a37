use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::community::AlertLevel;

/// Air temperature assumed when the feed does not report one, in °C.
pub const DEFAULT_AIR_TEMPERATURE_C: f64 = 28.0;

/// A score older than this is considered stale for display.
pub const FRESHNESS_WINDOW_MINUTES: i64 = 15;

/// Phase of the tide at the time of the reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TidePhase {
    Rising,
    High,
    Falling,
    Low,
}

impl TidePhase {
    pub const fn label(self) -> &'static str {
        match self {
            TidePhase::Rising => "Rising",
            TidePhase::High => "High",
            TidePhase::Falling => "Falling",
            TidePhase::Low => "Low",
        }
    }
}

/// Sky and precipitation pattern reported by the weather feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherPattern {
    Clear,
    PartlyCloudy,
    Overcast,
    OvercastWithRain,
}

impl WeatherPattern {
    pub const fn label(self) -> &'static str {
        match self {
            WeatherPattern::Clear => "Clear",
            WeatherPattern::PartlyCloudy => "Partly Cloudy",
            WeatherPattern::Overcast => "Overcast",
            WeatherPattern::OvercastWithRain => "Overcast with Rain",
        }
    }
}

fn default_air_temperature() -> f64 {
    DEFAULT_AIR_TEMPERATURE_C
}

/// Environmental snapshot handed to the score engine.
///
/// Wind speed is in m/s, temperatures in °C and salinity gradient in PSU. The
/// wind direction is a free-form cardinal string ("e", " NE ", "Southwest");
/// the engine normalizes case and surrounding whitespace itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalReading {
    pub observed_at: NaiveDateTime,
    pub wind_speed: f64,
    pub wind_direction: String,
    pub tide: TidePhase,
    #[serde(default)]
    pub next_high_tide: Option<NaiveDateTime>,
    #[serde(default)]
    pub next_low_tide: Option<NaiveDateTime>,
    #[serde(default)]
    pub water_temperature: Option<f64>,
    #[serde(default)]
    pub weather_pattern: Option<WeatherPattern>,
    #[serde(default)]
    pub salinity: Option<f64>,
    #[serde(default = "default_air_temperature")]
    pub air_temperature: f64,
}

impl EnvironmentalReading {
    /// Reading with only the mandatory fields; optional inputs are absent and
    /// the air temperature takes its default.
    pub fn new(
        observed_at: NaiveDateTime,
        wind_speed: f64,
        wind_direction: impl Into<String>,
        tide: TidePhase,
    ) -> Self {
        Self {
            observed_at,
            wind_speed,
            wind_direction: wind_direction.into(),
            tide,
            next_high_tide: None,
            next_low_tide: None,
            water_temperature: None,
            weather_pattern: None,
            salinity: None,
            air_temperature: DEFAULT_AIR_TEMPERATURE_C,
        }
    }
}

/// Hard precondition that zeroes the score when unmet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateFailure {
    OutsideSeason,
    OutsideTimeWindow,
    UnfavorableWind,
}

impl GateFailure {
    /// Short machine-facing reason carried with a zeroed score.
    pub const fn reason(self) -> &'static str {
        match self {
            GateFailure::OutsideSeason => "outside season",
            GateFailure::OutsideTimeWindow => "outside time window",
            GateFailure::UnfavorableWind => "unfavorable wind direction",
        }
    }

    /// Display text naming the bound that was missed.
    pub const fn detail(self) -> &'static str {
        match self {
            GateFailure::OutsideSeason => "Outside jubilee season (June-September)",
            GateFailure::OutsideTimeWindow => "Outside time window (9 PM - 8 AM)",
            GateFailure::UnfavorableWind => "Unfavorable wind direction (West/Southwest)",
        }
    }
}

/// Per-component points. `water_quality` is water temperature plus salinity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub seasonal: u32,
    pub time_window: u32,
    pub wind: u32,
    pub tide: u32,
    pub water_quality: u32,
    pub weather_pattern: u32,
}

impl ScoreBreakdown {
    pub fn sum(&self) -> u32 {
        self.seasonal
            + self.time_window
            + self.wind
            + self.tide
            + self.water_quality
            + self.weather_pattern
    }
}

/// Raw inputs echoed back alongside the score for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingSnapshot {
    pub wind_speed: f64,
    pub wind_direction: String,
    pub air_temperature: f64,
    pub tide: TidePhase,
    pub next_high_tide: Option<NaiveDateTime>,
    pub next_low_tide: Option<NaiveDateTime>,
    pub salinity: Option<f64>,
    pub water_temperature: Option<f64>,
    /// Not measured by any current feed; always `None`.
    pub dissolved_oxygen: Option<f64>,
}

impl From<&EnvironmentalReading> for ReadingSnapshot {
    fn from(reading: &EnvironmentalReading) -> Self {
        Self {
            wind_speed: reading.wind_speed,
            wind_direction: reading.wind_direction.clone(),
            air_temperature: reading.air_temperature,
            tide: reading.tide,
            next_high_tide: reading.next_high_tide,
            next_low_tide: reading.next_low_tide,
            salinity: reading.salinity,
            water_temperature: reading.water_temperature,
            dissolved_oxygen: None,
        }
    }
}

/// Output of the score engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionScore {
    /// `min(100, components.sum())`, or 0 when a gate failed.
    pub total: u32,
    pub components: ScoreBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<GateFailure>,
    pub readings: ReadingSnapshot,
    /// Community alerting is computed separately; the score always carries `None`.
    pub alert_level: AlertLevel,
    pub evaluated_at: NaiveDateTime,
}

impl ConditionScore {
    pub fn level(&self) -> ConditionLevel {
        ConditionLevel::from_score(self.total)
    }

    pub fn is_fresh(&self, now: NaiveDateTime) -> bool {
        now - self.evaluated_at < Duration::minutes(FRESHNESS_WINDOW_MINUTES)
    }

    pub fn summary(&self) -> String {
        match self.gate {
            Some(gate) => format!("0/100 - {}", gate.detail()),
            None => {
                let level = self.level();
                format!(
                    "{}/100 {} - {}",
                    self.total,
                    level.label(),
                    level.description()
                )
            }
        }
    }
}

/// Display banding of the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionLevel {
    Poor,
    Fair,
    Good,
    Excellent,
    Exceptional,
}

impl ConditionLevel {
    pub const fn from_score(score: u32) -> Self {
        match score {
            0..=29 => ConditionLevel::Poor,
            30..=49 => ConditionLevel::Fair,
            50..=69 => ConditionLevel::Good,
            70..=84 => ConditionLevel::Excellent,
            _ => ConditionLevel::Exceptional,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ConditionLevel::Poor => "Poor",
            ConditionLevel::Fair => "Fair",
            ConditionLevel::Good => "Good",
            ConditionLevel::Excellent => "Excellent",
            ConditionLevel::Exceptional => "Exceptional",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            ConditionLevel::Poor => "Jubilee unlikely",
            ConditionLevel::Fair => "Low probability",
            ConditionLevel::Good => "Possible conditions",
            ConditionLevel::Excellent => "Favorable conditions",
            ConditionLevel::Exceptional => "Highly favorable!",
        }
    }
}
