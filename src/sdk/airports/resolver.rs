use super::disambiguate::{DisambiguationRequest, Disambiguator};
use super::error::AirportError;
use super::record::AirportRecord;
use super::reference::ReferenceTable;

/// A reference row that matched an identifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'a> {
    pub row: usize,
    pub record: &'a AirportRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    NotFound,
    Unique(Candidate<'a>),
    /// Two or more distinct rows match; never settled without a decision.
    Ambiguous(Vec<Candidate<'a>>),
}

/// Looks `identifier` up against both code columns of the reference table.
/// A row matching on both columns counts once.
pub fn resolve<'a>(identifier: &str, reference: &'a ReferenceTable) -> Resolution<'a> {
    let mut candidates: Vec<Candidate<'a>> = reference
        .rows_matching(identifier)
        .iter()
        .filter_map(|&row| reference.get(row).map(|record| Candidate { row, record }))
        .collect();
    candidates.dedup_by_key(|c| c.row);

    match candidates.len() {
        0 => Resolution::NotFound,
        1 => Resolution::Unique(candidates[0]),
        _ => Resolution::Ambiguous(candidates),
    }
}

/// Turns a resolution into at most one record, asking `disambiguator` when
/// several rows match. The answer must be one of the candidate rows.
pub fn settle<'a>(
    identifier: &str,
    first_seen_row: usize,
    resolution: Resolution<'a>,
    disambiguator: &mut dyn Disambiguator,
) -> Result<Option<Candidate<'a>>, AirportError> {
    match resolution {
        Resolution::NotFound => Ok(None),
        Resolution::Unique(candidate) => Ok(Some(candidate)),
        Resolution::Ambiguous(candidates) => {
            let request = DisambiguationRequest {
                identifier,
                first_seen_row,
                candidates: &candidates,
            };
            log::info!(
                "{} matches reference rows {:?}; asking for a decision",
                identifier,
                request.candidate_rows()
            );
            let choice = disambiguator.choose(&request)?;
            let chosen = request.validate(choice)?;
            log::info!("{} resolved to reference row {}", identifier, chosen.row);
            Ok(Some(chosen))
        }
    }
}
