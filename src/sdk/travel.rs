// Business-travel log: one row per flight, origin and destination codes.
use super::airports::AirportError;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::{collections::HashSet, fs::File, io::Read, path::Path};

/// Placeholder the travel export uses when no airport was recorded.
pub const SENTINEL: &str = "---";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AirportRef {
    Code(String),
    Unknown,
}

impl AirportRef {
    pub fn parse(cell: &str) -> Self {
        let cell = cell.trim();
        if cell.is_empty() || cell == SENTINEL {
            AirportRef::Unknown
        } else {
            AirportRef::Code(cell.to_string())
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            AirportRef::Code(code) => Some(code),
            AirportRef::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightRecord {
    /// 1-based data row in the travel log.
    pub row: usize,
    pub origin: AirportRef,
    pub destination: AirportRef,
}

impl FlightRecord {
    pub fn new(row: usize, origin: &str, destination: &str) -> Self {
        Self {
            row,
            origin: AirportRef::parse(origin),
            destination: AirportRef::parse(destination),
        }
    }
}

#[derive(Deserialize)]
struct TravelRow {
    #[serde(rename = "Origination")]
    origination: String,
    #[serde(rename = "Destination")]
    destination: String,
}

/// An identifier used somewhere in the log, with the row it first shows up on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelIdentifier {
    pub code: String,
    pub first_seen_row: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TravelLog {
    flights: Vec<FlightRecord>,
}

impl TravelLog {
    pub fn new(flights: Vec<FlightRecord>) -> Self {
        Self { flights }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AirportError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let travel = Self::from_reader(file, &path.display().to_string())?;
        log::info!("Loaded {} flights from {}", travel.len(), path.display());
        Ok(travel)
    }

    pub fn from_reader<R: Read>(reader: R, source: &str) -> Result<Self, AirportError> {
        let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

        let headers = rdr.headers()?.clone();
        for column in ["Origination", "Destination"] {
            if !headers.iter().any(|h| h == column) {
                return Err(AirportError::MissingColumn {
                    path: source.to_string(),
                    column,
                });
            }
        }

        let mut flights = Vec::new();
        for (i, result) in rdr.deserialize().enumerate() {
            let row: TravelRow = result?;
            flights.push(FlightRecord::new(i + 1, &row.origination, &row.destination));
        }
        Ok(Self { flights })
    }

    pub fn flights(&self) -> &[FlightRecord] {
        &self.flights
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// Every distinct origin/destination code, sentinel excluded, in order of
    /// first appearance (origin before destination within a row).
    pub fn unique_identifiers(&self) -> Vec<TravelIdentifier> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for flight in &self.flights {
            for code in [flight.origin.code(), flight.destination.code()]
                .into_iter()
                .flatten()
            {
                if seen.insert(code) {
                    out.push(TravelIdentifier {
                        code: code.to_string(),
                        first_seen_row: flight.row,
                    });
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_and_blank_cells_are_unknown() {
        assert_eq!(AirportRef::parse("---"), AirportRef::Unknown);
        assert_eq!(AirportRef::parse("  "), AirportRef::Unknown);
        assert_eq!(AirportRef::parse(" BTV "), AirportRef::Code("BTV".into()));
    }

    #[test]
    fn test_from_reader_numbers_rows_from_one() {
        let csv = "Traveler,Origination,Destination\nA,BTV,JFK\nB,---,LAX\n";
        let log = TravelLog::from_reader(csv.as_bytes(), "inline").unwrap();
        assert_eq!(
            log.flights(),
            &[
                FlightRecord::new(1, "BTV", "JFK"),
                FlightRecord::new(2, "---", "LAX"),
            ]
        );
    }

    #[test]
    fn test_missing_destination_column() {
        let csv = "Origination\nBTV\n";
        let err = TravelLog::from_reader(csv.as_bytes(), "travel.csv").unwrap_err();
        assert!(matches!(
            err,
            AirportError::MissingColumn {
                column: "Destination",
                ..
            }
        ));
    }

    #[test]
    fn test_unique_identifiers_skip_sentinel_and_keep_first_row() {
        let log = TravelLog::new(vec![
            FlightRecord::new(1, "BTV", "JFK"),
            FlightRecord::new(2, "---", "LAX"),
            FlightRecord::new(3, "JFK", "BTV"),
            FlightRecord::new(4, "LAX", "---"),
        ]);
        let ids = log.unique_identifiers();
        let pairs: Vec<(&str, usize)> = ids
            .iter()
            .map(|id| (id.code.as_str(), id.first_seen_row))
            .collect();
        assert_eq!(pairs, vec![("BTV", 1), ("JFK", 1), ("LAX", 2)]);
    }
}
