use super::error::AirportError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// (latitude, longitude) in decimal degrees.
pub type Coord = (f64, f64);

/// One row of the airport reference table.
///
/// Only the codes and the coordinate string take part in matching and
/// distance work; the remaining columns are carried through unchanged so the
/// working file keeps the reference layout.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AirportRecord {
    #[serde(default)]
    pub ident: String,
    #[serde(rename = "type", default)]
    pub airport_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub elevation_ft: String,
    #[serde(default)]
    pub continent: String,
    #[serde(default)]
    pub iso_country: String,
    #[serde(default)]
    pub iso_region: String,
    #[serde(default)]
    pub municipality: String,
    #[serde(default)]
    pub gps_code: String,
    pub iata_code: String,
    pub local_code: String,
    pub coordinates: String,
}

/// Columns every airport table must provide.
pub const REQUIRED_COLUMNS: [&str; 3] = ["local_code", "iata_code", "coordinates"];

/// Column order used when writing airport tables, matching the field order.
pub const COLUMNS: [&str; 12] = [
    "ident",
    "type",
    "name",
    "elevation_ft",
    "continent",
    "iso_country",
    "iso_region",
    "municipality",
    "gps_code",
    "iata_code",
    "local_code",
    "coordinates",
];

/// The pair that must be unique across the working airport set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub local_code: String,
    pub iata_code: String,
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.local_code, self.iata_code)
    }
}

impl AirportRecord {
    /// Builds a record with just the fields matching cares about.
    pub fn new(local_code: &str, iata_code: &str, coordinates: &str) -> Self {
        Self {
            local_code: local_code.to_string(),
            iata_code: iata_code.to_string(),
            coordinates: coordinates.to_string(),
            ..Self::default()
        }
    }

    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey {
            local_code: self.local_code.clone(),
            iata_code: self.iata_code.clone(),
        }
    }

    /// True when `identifier` equals either code. Blank codes never match.
    pub fn matches(&self, identifier: &str) -> bool {
        self.codes().any(|code| code == identifier)
    }

    /// The non-blank codes of this record, without repeating a code that
    /// appears in both fields.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        let local = self.local_code.trim();
        let iata = self.iata_code.trim();
        let iata = (iata != local).then_some(iata);
        std::iter::once(local)
            .chain(iata)
            .filter(|code| !code.is_empty())
    }

    pub fn coord(&self) -> Result<Coord, AirportError> {
        parse_coordinates(&self.coordinates)
    }
}

/// Parses a `"latitude,longitude"` string, splitting on the first comma.
pub fn parse_coordinates(raw: &str) -> Result<Coord, AirportError> {
    let malformed = || AirportError::MalformedCoordinate {
        raw: raw.to_string(),
    };

    let (lat, lon) = raw.split_once(',').ok_or_else(malformed)?;
    let lat: f64 = lat.trim().parse().map_err(|_| malformed())?;
    let lon: f64 = lon.trim().parse().map_err(|_| malformed())?;

    if !lat.is_finite() || !lon.is_finite() || lat.abs() > 90.0 || lon.abs() > 180.0 {
        return Err(malformed());
    }
    Ok((lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_parse_coordinates_splits_on_first_comma() {
        let (lat, lon) = parse_coordinates("44.4719, -73.1533").unwrap();
        assert_abs_diff_eq!(lat, 44.4719);
        assert_abs_diff_eq!(lon, -73.1533);
    }

    #[test]
    fn test_parse_coordinates_rejects_malformed_input() {
        for raw in ["", "44.47", "44.47,", "abc,-73.1", "44.4,-73.1,12", "NaN,1.0", "95.0,10.0"] {
            assert!(
                matches!(
                    parse_coordinates(raw),
                    Err(AirportError::MalformedCoordinate { .. })
                ),
                "{raw:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_matches_on_either_code() {
        let record = AirportRecord::new("1B1", "HCC", "42.29,-73.71");
        assert!(record.matches("1B1"));
        assert!(record.matches("HCC"));
        assert!(!record.matches("BTV"));
    }

    #[test]
    fn test_blank_codes_never_match() {
        let record = AirportRecord::new("", "", "0,0");
        assert!(!record.matches(""));
        assert_eq!(record.codes().count(), 0);
    }

    #[test]
    fn test_codes_are_not_repeated_when_equal() {
        let record = AirportRecord::new("BTV", "BTV", "44.4719,-73.1533");
        assert_eq!(record.codes().collect::<Vec<_>>(), vec!["BTV"]);
    }
}
