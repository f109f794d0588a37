use super::domain::GateFailure;

/// Months (1-12) in which jubilees occur.
const SEASON_MONTHS: [u32; 4] = [6, 7, 8, 9];

/// Compass sectors the wind rules distinguish between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindSector {
    /// E, EAST, NE, NORTHEAST: onshore push, full wind points.
    EastNortheast,
    /// N, NORTH, SE, SOUTHEAST: 70% of wind points.
    NorthSoutheast,
    /// W, WEST, SW, SOUTHWEST: blocks the event entirely.
    WestSouthwest,
    /// Anything else, including unrecognized strings: 50% of wind points.
    Other,
}

impl WindSector {
    pub fn classify(normalized: &str) -> Self {
        match normalized {
            "E" | "EAST" | "NE" | "NORTHEAST" => WindSector::EastNortheast,
            "N" | "NORTH" | "SE" | "SOUTHEAST" => WindSector::NorthSoutheast,
            "W" | "WEST" | "SW" | "SOUTHWEST" => WindSector::WestSouthwest,
            _ => WindSector::Other,
        }
    }
}

/// Upper-cases and trims a free-form direction string.
pub fn normalize_direction(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Evaluates the three gates in order; the first failure wins.
pub(crate) fn check_gates(month: u32, hour: u32, sector: WindSector) -> Result<(), GateFailure> {
    if !SEASON_MONTHS.contains(&month) {
        return Err(GateFailure::OutsideSeason);
    }

    // Open from 21:00 through 07:59.
    if (8..21).contains(&hour) {
        return Err(GateFailure::OutsideTimeWindow);
    }

    if sector == WindSector::WestSouthwest {
        return Err(GateFailure::UnfavorableWind);
    }

    Ok(())
}
