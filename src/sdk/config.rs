use std::{env, path::PathBuf};

pub const DEFAULT_REFERENCE_FILE: &str = "airport_codes.csv";
pub const DEFAULT_WORKING_FILE: &str = "modified_air_codes.csv";

/// Where a run reads and writes its tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub reference_path: PathBuf,
    pub working_path: PathBuf,
    pub travel_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    /// Compute everything but leave the working file as it was.
    pub dry_run: bool,
}

impl RunConfig {
    /// Reads `AIRPORT_CODES_FILE`, `WORKING_AIRPORTS_FILE`, `TRAVEL_FILE` and
    /// `EMISSIONS_REPORT_FILE`, falling back to the conventional file names.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = |key: &str| lookup(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);
        Self {
            reference_path: path("AIRPORT_CODES_FILE")
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REFERENCE_FILE)),
            working_path: path("WORKING_AIRPORTS_FILE")
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKING_FILE)),
            travel_path: path("TRAVEL_FILE"),
            report_path: path("EMISSIONS_REPORT_FILE"),
            dry_run: false,
        }
    }
}
