use super::distance::{distance_km, km_to_miles};
use super::factors::{accumulate, flight_emissions_kg, HaulTier};
use crate::sdk::airports::{AirportError, Coord, WorkingAirportSet};
use crate::sdk::travel::{AirportRef, FlightRecord, TravelLog, SENTINEL};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{fs, path::Path};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Origin or destination recorded as the sentinel.
    UnknownAirport,
    /// Code not present in the working set.
    UnresolvedAirport { identifier: String },
    MalformedCoordinate { identifier: String, raw: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedFlight {
    pub row: usize,
    pub origin: String,
    pub destination: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightEmissions {
    pub row: usize,
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
    pub distance_miles: f64,
    pub tier: HaulTier,
    pub kg_co2: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TierTotals {
    pub flights: usize,
    pub miles: f64,
    pub kg_co2: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TierBreakdown {
    pub short: TierTotals,
    pub medium: TierTotals,
    pub long: TierTotals,
}

impl TierBreakdown {
    fn add(&mut self, flight: &FlightEmissions) {
        let totals = match flight.tier {
            HaulTier::Short => &mut self.short,
            HaulTier::Medium => &mut self.medium,
            HaulTier::Long => &mut self.long,
        };
        totals.flights += 1;
        totals.miles += flight.distance_miles;
        totals.kg_co2 += flight.kg_co2;
    }
}

/// Result of running the travel log through the working airport set.
#[derive(Debug, Clone, Serialize)]
pub struct EmissionsReport {
    pub generated_at: DateTime<Utc>,
    pub flights_in_log: usize,
    pub total_kg_co2: f64,
    pub total_tons_co2: f64,
    pub tiers: TierBreakdown,
    pub flights: Vec<FlightEmissions>,
    pub skipped: Vec<SkippedFlight>,
    pub unresolved_identifiers: Vec<String>,
}

impl EmissionsReport {
    /// Computes distance and emissions for every flight whose two airports
    /// have usable coordinates in `working`. Every other flight lands in
    /// `skipped` and contributes nothing to the totals.
    pub fn compute(
        travel_log: &TravelLog,
        working: &WorkingAirportSet,
        unresolved_identifiers: Vec<String>,
    ) -> Self {
        let mut flights = Vec::new();
        let mut skipped = Vec::new();

        for flight in travel_log.flights() {
            match flight_emissions(flight, working) {
                Ok(computed) => {
                    log::debug!(
                        "Row {}: {} -> {} {:.1} mi ({}) {:.2} kg",
                        computed.row,
                        computed.origin,
                        computed.destination,
                        computed.distance_miles,
                        computed.tier,
                        computed.kg_co2
                    );
                    flights.push(computed);
                }
                Err(reason) => {
                    if reason != SkipReason::UnknownAirport {
                        log::warn!("Skipping travel row {}: {:?}", flight.row, reason);
                    }
                    skipped.push(SkippedFlight {
                        row: flight.row,
                        origin: label(&flight.origin).to_string(),
                        destination: label(&flight.destination).to_string(),
                        reason,
                    });
                }
            }
        }

        let total_kg_co2 = flights
            .iter()
            .fold(0.0, |total, f| accumulate(f.distance_miles, total));
        let mut tiers = TierBreakdown::default();
        for flight in &flights {
            tiers.add(flight);
        }

        log::info!(
            "{} of {} flights counted, {} skipped: {:.1} kg CO2 ({:.3} t)",
            flights.len(),
            travel_log.len(),
            skipped.len(),
            total_kg_co2,
            total_kg_co2 / 1000.0
        );

        Self {
            generated_at: Utc::now(),
            flights_in_log: travel_log.len(),
            total_kg_co2,
            total_tons_co2: total_kg_co2 / 1000.0,
            tiers,
            flights,
            skipped,
            unresolved_identifiers,
        }
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), AirportError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Emissions report written to {}", path.as_ref().display());
        Ok(())
    }
}

fn label(airport: &AirportRef) -> &str {
    airport.code().unwrap_or(SENTINEL)
}

fn locate(identifier: &str, working: &WorkingAirportSet) -> Result<Coord, SkipReason> {
    let record = working
        .find(identifier)
        .ok_or_else(|| SkipReason::UnresolvedAirport {
            identifier: identifier.to_string(),
        })?;
    record.coord().map_err(|_| SkipReason::MalformedCoordinate {
        identifier: identifier.to_string(),
        raw: record.coordinates.clone(),
    })
}

fn flight_emissions(
    flight: &FlightRecord,
    working: &WorkingAirportSet,
) -> Result<FlightEmissions, SkipReason> {
    let (Some(origin), Some(destination)) = (flight.origin.code(), flight.destination.code())
    else {
        return Err(SkipReason::UnknownAirport);
    };

    let from = locate(origin, working)?;
    let to = locate(destination, working)?;

    let km = distance_km(from, to);
    let miles = km_to_miles(km);
    Ok(FlightEmissions {
        row: flight.row,
        origin: origin.to_string(),
        destination: destination.to_string(),
        distance_km: km,
        distance_miles: miles,
        tier: HaulTier::for_distance(miles),
        kg_co2: flight_emissions_kg(miles),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::airports::AirportRecord;
    use approx::assert_relative_eq;

    fn working() -> WorkingAirportSet {
        WorkingAirportSet::new(vec![
            AirportRecord::new("BTV", "BTV", "44.4719,-73.1533"),
            AirportRecord::new("JFK", "JFK", "40.6413,-73.7781"),
            AirportRecord::new("LAX", "LAX", "33.9416,-118.4085"),
            AirportRecord::new("BAD", "BAD", "forty,-seventy"),
        ])
    }

    #[test]
    fn test_single_resolved_flight() {
        let log = TravelLog::new(vec![FlightRecord::new(1, "BTV", "JFK")]);
        let report = EmissionsReport::compute(&log, &working(), Vec::new());

        assert_eq!(report.flights.len(), 1);
        let flight = &report.flights[0];
        assert!(flight.distance_km > 0.0);
        assert_eq!(flight.tier, HaulTier::Short);
        assert_relative_eq!(flight.kg_co2, flight.distance_miles * 0.206);
        assert_relative_eq!(report.total_kg_co2, flight.kg_co2);
        assert_relative_eq!(report.total_tons_co2, flight.kg_co2 / 1000.0);
    }

    #[test]
    fn test_sentinel_flights_are_excluded() {
        let log = TravelLog::new(vec![
            FlightRecord::new(1, "---", "JFK"),
            FlightRecord::new(2, "BTV", "---"),
        ]);
        let report = EmissionsReport::compute(&log, &working(), Vec::new());
        assert!(report.flights.is_empty());
        assert_eq!(report.total_kg_co2, 0.0);
        assert!(report
            .skipped
            .iter()
            .all(|s| s.reason == SkipReason::UnknownAirport));
    }

    #[test]
    fn test_unlocatable_airports_are_skipped_not_zero() {
        let log = TravelLog::new(vec![
            FlightRecord::new(1, "BTV", "ZZZ"),
            FlightRecord::new(2, "BAD", "JFK"),
            FlightRecord::new(3, "JFK", "LAX"),
        ]);
        let report = EmissionsReport::compute(&log, &working(), vec!["ZZZ".into()]);

        assert_eq!(report.flights.len(), 1);
        assert_eq!(report.flights[0].row, 3);
        assert_eq!(
            report.skipped[0].reason,
            SkipReason::UnresolvedAirport { identifier: "ZZZ".into() }
        );
        assert_eq!(
            report.skipped[1].reason,
            SkipReason::MalformedCoordinate {
                identifier: "BAD".into(),
                raw: "forty,-seventy".into()
            }
        );
        assert_eq!(report.unresolved_identifiers, vec!["ZZZ".to_string()]);
    }

    #[test]
    fn test_totals_are_sum_of_flights() {
        let log = TravelLog::new(vec![
            FlightRecord::new(1, "BTV", "JFK"),
            FlightRecord::new(2, "JFK", "LAX"),
            FlightRecord::new(3, "LAX", "BTV"),
            FlightRecord::new(4, "JFK", "BTV"),
        ]);
        let report = EmissionsReport::compute(&log, &working(), Vec::new());
        let sum: f64 = report.flights.iter().map(|f| f.kg_co2).sum();
        assert_relative_eq!(report.total_kg_co2, sum, max_relative = 1e-12);

        let tiers = report.tiers;
        assert_eq!(tiers.short.flights + tiers.medium.flights + tiers.long.flights, 4);
        assert_eq!(tiers.short.flights, 2);
        assert_relative_eq!(
            tiers.short.kg_co2 + tiers.medium.kg_co2 + tiers.long.kg_co2,
            sum,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_report_serializes_skip_reason_inline() {
        let log = TravelLog::new(vec![FlightRecord::new(7, "---", "JFK")]);
        let report = EmissionsReport::compute(&log, &working(), Vec::new());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["skipped"][0]["reason"], "unknown_airport");
        assert_eq!(json["skipped"][0]["origin"], "---");
        assert_eq!(json["skipped"][0]["row"], 7);
    }
}
