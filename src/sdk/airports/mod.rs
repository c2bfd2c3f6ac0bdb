pub mod disambiguate;
pub mod error;
pub mod record;
pub mod reference;
pub mod resolver;
pub mod working_set;

pub use disambiguate::{
    DisambiguationRequest, Disambiguator, FirstCandidate, PresetChoices, PromptDisambiguator,
    RefuseAmbiguity,
};
pub use error::AirportError;
pub use record::{parse_coordinates, AirportRecord, Coord, IdentityKey};
pub use reference::ReferenceTable;
pub use resolver::{resolve, settle, Candidate, Resolution};
pub use working_set::{reconcile, AddedAirport, Reconciliation, WorkingAirportSet};
