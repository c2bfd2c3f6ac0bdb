use thiserror::Error;

#[derive(Error, Debug)]
pub enum AirportError {
    #[error("{path}: required column `{column}` is missing")]
    MissingColumn { path: String, column: &'static str },

    // Raised by policies that refuse to pick; the run stops here
    #[error("Identifier {identifier} matches reference rows {candidates:?} and no decision was made")]
    AmbiguousMatch {
        identifier: String,
        candidates: Vec<usize>,
    },

    #[error("Row {choice} is not one of the candidates {candidates:?} for identifier {identifier}")]
    InvalidChoice {
        identifier: String,
        choice: String,
        candidates: Vec<usize>,
    },

    #[error("Malformed coordinate string: {raw:?}")]
    MalformedCoordinate { raw: String },

    #[error(
        "Working airport set holds ({local_code:?}, {iata_code:?}) at both position {first} and {second}"
    )]
    ConsistencyViolation {
        local_code: String,
        iata_code: String,
        first: usize,
        second: usize,
    },

    #[error("No travel log configured (set TRAVEL_FILE or pass --travel)")]
    NoTravelLog,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}
