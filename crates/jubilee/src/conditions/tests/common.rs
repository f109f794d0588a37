use chrono::{NaiveDate, NaiveDateTime};

use crate::conditions::domain::{EnvironmentalReading, TidePhase};

/// 2025-`month`-10 at `hour`:30 on the local clock.
pub(super) fn at(month: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, month, 10)
        .expect("valid date")
        .and_hms_opt(hour, 30, 0)
        .expect("valid time")
}

/// Reading with only the mandatory fields populated.
pub(super) fn reading(direction: &str, speed: f64, tide: TidePhase) -> EnvironmentalReading {
    EnvironmentalReading::new(at(7, 2), speed, direction, tide)
}

/// An east wind in the ideal speed band on a rising tide.
pub(super) fn onshore_reading() -> EnvironmentalReading {
    reading("E", 2.5, TidePhase::Rising)
}
