//! EPA business-travel emission factors, in kg CO2 per passenger-mile.
use serde::Serialize;
use std::fmt;

pub const SHORT_HAUL_FACTOR: f64 = 0.206;
pub const MEDIUM_HAUL_FACTOR: f64 = 0.131;
pub const LONG_HAUL_FACTOR: f64 = 0.161;

/// Flights shorter than this are short haul.
pub const SHORT_HAUL_LIMIT_MILES: f64 = 300.0;
/// Flights up to and including this distance are medium haul.
pub const MEDIUM_HAUL_LIMIT_MILES: f64 = 2300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HaulTier {
    Short,
    Medium,
    Long,
}

impl HaulTier {
    /// Short below 300 miles, medium from 300 through 2300, long beyond.
    pub fn for_distance(miles: f64) -> Self {
        if miles < SHORT_HAUL_LIMIT_MILES {
            HaulTier::Short
        } else if miles <= MEDIUM_HAUL_LIMIT_MILES {
            HaulTier::Medium
        } else {
            HaulTier::Long
        }
    }

    pub fn factor(self) -> f64 {
        match self {
            HaulTier::Short => SHORT_HAUL_FACTOR,
            HaulTier::Medium => MEDIUM_HAUL_FACTOR,
            HaulTier::Long => LONG_HAUL_FACTOR,
        }
    }
}

impl fmt::Display for HaulTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HaulTier::Short => "short haul",
            HaulTier::Medium => "medium haul",
            HaulTier::Long => "long haul",
        };
        f.write_str(name)
    }
}

/// kg CO2 for one flight of `miles`.
pub fn flight_emissions_kg(miles: f64) -> f64 {
    miles * HaulTier::for_distance(miles).factor()
}

/// Adds one flight to a running total.
pub fn accumulate(distance_miles: f64, running_total_kg: f64) -> f64 {
    running_total_kg + flight_emissions_kg(distance_miles)
}
