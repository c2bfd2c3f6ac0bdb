pub mod distance;
pub mod factors;
pub mod report;

pub use distance::{distance_km, km_to_miles};
pub use factors::{accumulate, flight_emissions_kg, HaulTier};
pub use report::{EmissionsReport, FlightEmissions, SkipReason, SkippedFlight};
