//! Representative Mobile Bay readings used by the demo and in docs.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::domain::{EnvironmentalReading, TidePhase, WeatherPattern};

fn at(year: i32, month: u32, day: u32, hour: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, 0, 0)
}

/// 2 AM in mid-August with a light east wind on a rising tide.
///
/// Returns `None` only if `year` is outside chrono's supported range.
pub fn favorable(year: i32) -> Option<EnvironmentalReading> {
    let observed_at = at(year, 8, 15, 2)?;
    Some(EnvironmentalReading {
        next_high_tide: Some(observed_at + Duration::hours(2)),
        next_low_tide: Some(observed_at + Duration::hours(8)),
        water_temperature: Some(29.0),
        weather_pattern: Some(WeatherPattern::OvercastWithRain),
        salinity: Some(9.0),
        air_temperature: 27.0,
        ..EnvironmentalReading::new(observed_at, 2.5, "E", TidePhase::Rising)
    })
}

/// 11 PM in mid-July with a moderate southeast wind on a falling tide.
pub fn typical(year: i32) -> Option<EnvironmentalReading> {
    let observed_at = at(year, 7, 15, 23)?;
    Some(EnvironmentalReading {
        next_high_tide: Some(observed_at + Duration::hours(5)),
        next_low_tide: Some(observed_at + Duration::hours(1)),
        water_temperature: Some(26.5),
        weather_pattern: Some(WeatherPattern::PartlyCloudy),
        salinity: Some(5.5),
        air_temperature: 25.0,
        ..EnvironmentalReading::new(observed_at, 4.2, "SE", TidePhase::Falling)
    })
}
