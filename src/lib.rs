pub mod sdk;

pub use sdk::airports::{
    reconcile, resolve, AirportError, AirportRecord, Disambiguator, ReferenceTable, Resolution,
    WorkingAirportSet,
};
pub use sdk::config::RunConfig;
pub use sdk::emissions::{accumulate, distance_km, EmissionsReport, HaulTier};
pub use sdk::pipeline::{run, RunOutcome};
pub use sdk::travel::{FlightRecord, TravelLog};
