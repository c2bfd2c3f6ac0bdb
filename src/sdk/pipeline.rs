use super::airports::{
    reconcile, AddedAirport, AirportError, Disambiguator, ReferenceTable, WorkingAirportSet,
};
use super::config::RunConfig;
use super::emissions::EmissionsReport;
use super::travel::TravelLog;

#[derive(Debug)]
pub struct RunOutcome {
    pub added: Vec<AddedAirport>,
    pub working_len: usize,
    pub report: EmissionsReport,
}

/// One read-reconcile-write cycle followed by the emissions pass.
///
/// Any error before the save leaves the working file exactly as it was.
pub fn run(
    config: &RunConfig,
    disambiguator: &mut dyn Disambiguator,
) -> Result<RunOutcome, AirportError> {
    let travel_path = config.travel_path.as_ref().ok_or(AirportError::NoTravelLog)?;

    let reference = ReferenceTable::load(&config.reference_path)?;
    let travel_log = TravelLog::load(travel_path)?;
    let existing = WorkingAirportSet::load_from_file(&config.working_path)?;

    let reconciled = reconcile(&travel_log, &reference, existing, disambiguator)?;

    if config.dry_run {
        log::info!(
            "Dry run: {} left unchanged",
            config.working_path.display()
        );
    } else {
        reconciled.working.save_to_file(&config.working_path)?;
    }

    let report = EmissionsReport::compute(&travel_log, &reconciled.working, reconciled.unresolved);
    if let Some(path) = &config.report_path {
        report.write_json(path)?;
    }

    Ok(RunOutcome {
        added: reconciled.added,
        working_len: reconciled.working.len(),
        report,
    })
}
