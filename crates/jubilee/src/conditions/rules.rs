use super::domain::{EnvironmentalReading, ScoreBreakdown, TidePhase, WeatherPattern};
use super::gates::WindSector;

/// Boost applied to wind + tide when an east/northeast wind meets a rising tide.
const ONSHORE_MULTIPLIER: f64 = 1.3;

pub(crate) fn score_components(
    reading: &EnvironmentalReading,
    month: u32,
    hour: u32,
    sector: WindSector,
) -> ScoreBreakdown {
    let mut wind = wind_score(reading.wind_speed, sector);
    let mut tide = tide_score(reading.tide);

    if sector == WindSector::EastNortheast && reading.tide == TidePhase::Rising {
        (wind, tide) = apply_onshore_multiplier(wind, tide);
    }

    ScoreBreakdown {
        seasonal: seasonal_score(month),
        time_window: time_window_score(hour),
        wind,
        tide,
        water_quality: water_temperature_score(reading.water_temperature)
            + salinity_score(reading.salinity),
        weather_pattern: weather_pattern_score(reading.weather_pattern),
    }
}

pub(crate) fn seasonal_score(month: u32) -> u32 {
    match month {
        6 => 10,
        7 => 15,
        8 => 20,
        9 => 12,
        _ => 0,
    }
}

pub(crate) fn time_window_score(hour: u32) -> u32 {
    match hour {
        1..=3 => 15,
        0 | 4 | 5 => 10,
        21..=23 | 6 | 7 => 5,
        _ => 0,
    }
}

pub(crate) fn wind_score(speed: f64, sector: WindSector) -> u32 {
    let base: u32 = if (1.86..3.0).contains(&speed) {
        25
    } else if (3.0..5.0).contains(&speed) {
        20
    } else if (5.0..8.0).contains(&speed) {
        15
    } else {
        // 8 m/s and up, calm air below 1.86 m/s, and anything unparseable.
        5
    };

    match sector {
        WindSector::EastNortheast => base,
        WindSector::NorthSoutheast => (f64::from(base) * 0.7) as u32,
        WindSector::WestSouthwest | WindSector::Other => (f64::from(base) * 0.5) as u32,
    }
}

pub(crate) fn tide_score(tide: TidePhase) -> u32 {
    match tide {
        TidePhase::Rising => 15,
        TidePhase::High => 10,
        TidePhase::Falling => 5,
        TidePhase::Low => 3,
    }
}

/// Scales wind + tide by 1.3 and hands the boost back proportionally.
///
/// The tide share is divided by the already-boosted wind score, so the two
/// shares do not always add up to the full boost. Published scores depend on
/// this exact order of evaluation.
pub(crate) fn apply_onshore_multiplier(wind: u32, tide: u32) -> (u32, u32) {
    let combined = wind + tide;
    if combined == 0 {
        return (wind, tide);
    }

    let multiplied = (f64::from(combined) * ONSHORE_MULTIPLIER) as u32;
    let boost = multiplied.saturating_sub(combined);

    let wind = wind + (boost * wind) / (wind + tide);
    let tide = tide + (boost * tide) / (wind + tide);
    (wind, tide)
}

pub(crate) fn water_temperature_score(temperature: Option<f64>) -> u32 {
    match temperature {
        Some(t) if t >= 28.0 => 10,
        Some(t) if t >= 25.0 => 8,
        Some(t) if t >= 22.0 => 5,
        _ => 0,
    }
}

pub(crate) fn weather_pattern_score(pattern: Option<WeatherPattern>) -> u32 {
    match pattern {
        Some(WeatherPattern::OvercastWithRain) => 10,
        Some(WeatherPattern::Overcast) => 7,
        Some(WeatherPattern::PartlyCloudy) => 6,
        Some(WeatherPattern::Clear) | None => 5,
    }
}

pub(crate) fn salinity_score(gradient: Option<f64>) -> u32 {
    match gradient {
        Some(g) if g >= 8.0 => 5,
        Some(g) if g >= 4.0 => 3,
        _ => 0,
    }
}
