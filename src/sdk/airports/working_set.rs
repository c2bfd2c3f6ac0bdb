use super::disambiguate::Disambiguator;
use super::error::AirportError;
use super::record::{AirportRecord, IdentityKey, COLUMNS};
use super::reference::{read_airport_csv, ReferenceTable};
use super::resolver::{resolve, settle};
use crate::sdk::travel::TravelLog;
use csv::WriterBuilder;
use std::{
    collections::{HashMap, HashSet},
    fs::{self, File},
    io::Read,
    path::{Path, PathBuf},
};

/// Airports the travel log has actually used, carried from run to run.
///
/// Entries are only ever appended, and no two share an identity key.
#[derive(Debug, Clone, Default)]
pub struct WorkingAirportSet {
    records: Vec<AirportRecord>,
    // code -> position of the first entry carrying it
    by_code: HashMap<String, usize>,
    by_key: HashMap<IdentityKey, usize>,
    // identifier -> airport it was resolved to during this session
    bindings: HashMap<String, IdentityKey>,
}

/// An airport appended by [`reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedAirport {
    pub identifier: String,
    pub reference_row: usize,
}

#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub working: WorkingAirportSet,
    pub added: Vec<AddedAirport>,
    /// Identifiers absent from the reference table, in travel-log order.
    pub unresolved: Vec<String>,
}

impl WorkingAirportSet {
    pub fn new(records: Vec<AirportRecord>) -> Self {
        Self::with_bindings(records, HashMap::new())
    }

    fn with_bindings(
        records: Vec<AirportRecord>,
        bindings: HashMap<String, IdentityKey>,
    ) -> Self {
        let mut by_code = HashMap::new();
        let mut by_key = HashMap::new();
        for (pos, record) in records.iter().enumerate() {
            for code in record.codes() {
                by_code.entry(code.to_string()).or_insert(pos);
            }
            by_key.entry(record.identity_key()).or_insert(pos);
        }
        Self {
            records,
            by_code,
            by_key,
            bindings,
        }
    }

    /// Reads the persisted set. A missing or empty file is an empty set.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, AirportError> {
        let path = path.as_ref();
        if !path.exists() || fs::metadata(path)?.len() == 0 {
            log::info!(
                "No working airport file at {}; starting empty",
                path.display()
            );
            return Ok(Self::default());
        }
        let set = Self::from_reader(File::open(path)?, &path.display().to_string())?;
        log::info!(
            "Loaded {} working airports from {}",
            set.len(),
            path.display()
        );
        Ok(set)
    }

    pub fn from_reader<R: Read>(reader: R, source: &str) -> Result<Self, AirportError> {
        Ok(Self::new(read_airport_csv(reader, source)?))
    }

    /// Rewrites the whole file through a temporary sibling so readers only
    /// ever see a complete snapshot. Refuses to write a set with duplicate
    /// identity keys.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), AirportError> {
        self.verify_unique()?;

        let path = path.as_ref();
        let tmp = temp_path(path);
        if let Err(e) = self.write_csv(&tmp) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        log::info!("Saved {} working airports to {}", self.len(), path.display());
        Ok(())
    }

    fn write_csv(&self, path: &Path) -> Result<(), AirportError> {
        let mut wtr = WriterBuilder::new().has_headers(false).from_path(path)?;
        wtr.write_record(COLUMNS)?;
        for record in &self.records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Fails on the first pair of entries sharing (local_code, iata_code).
    pub fn verify_unique(&self) -> Result<(), AirportError> {
        let mut seen: HashMap<IdentityKey, usize> = HashMap::new();
        for (pos, record) in self.records.iter().enumerate() {
            let key = record.identity_key();
            if let Some(&first) = seen.get(&key) {
                return Err(AirportError::ConsistencyViolation {
                    local_code: key.local_code,
                    iata_code: key.iata_code,
                    first,
                    second: pos,
                });
            }
            seen.insert(key, pos);
        }
        Ok(())
    }

    /// The airport `identifier` stands for: the one it was resolved to by
    /// [`reconcile`] if any, otherwise the earliest entry whose local or IATA
    /// code equals it.
    pub fn find(&self, identifier: &str) -> Option<&AirportRecord> {
        self.bindings
            .get(identifier)
            .and_then(|key| self.by_key.get(key))
            .or_else(|| self.by_code.get(identifier))
            .and_then(|&pos| self.records.get(pos))
    }

    pub fn contains_identifier(&self, identifier: &str) -> bool {
        self.by_code.contains_key(identifier)
    }

    pub fn records(&self) -> &[AirportRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Brings `existing` up to date with every airport `travel_log` mentions.
///
/// Identifiers already carried by an entry are left alone. Every other one
/// is resolved against `reference`, asking `disambiguator` when a code is
/// ambiguous; codes the reference lacks are returned in `unresolved` and do
/// not stop the others. Existing entries keep their positions and new ones
/// follow them. A new airport chosen for a code goes ahead of any airport
/// added earlier in the run that merely shares the code, so the saved file
/// looks that code up to the same airport.
pub fn reconcile(
    travel_log: &TravelLog,
    reference: &ReferenceTable,
    existing: WorkingAirportSet,
    disambiguator: &mut dyn Disambiguator,
) -> Result<Reconciliation, AirportError> {
    let missing: Vec<_> = travel_log
        .unique_identifiers()
        .into_iter()
        .filter(|id| !existing.contains_identifier(&id.code))
        .collect();

    if missing.is_empty() {
        log::info!("Every travel airport is already in the working set");
    } else {
        log::info!(
            "Airports missing from the working set: {:?}",
            missing.iter().map(|id| id.code.as_str()).collect::<Vec<_>>()
        );
    }

    let kept = existing.records.len();
    let mut keys: HashSet<IdentityKey> = existing.by_key.keys().cloned().collect();
    let mut bindings = existing.bindings;
    let mut records = existing.records;
    let mut added = Vec::new();
    let mut unresolved = Vec::new();

    for id in missing {
        let resolution = resolve(&id.code, reference);
        let Some(candidate) = settle(&id.code, id.first_seen_row, resolution, disambiguator)?
        else {
            log::warn!(
                "{} (travel row {}) is not in the reference table",
                id.code,
                id.first_seen_row
            );
            unresolved.push(id.code);
            continue;
        };

        let key = candidate.record.identity_key();
        if keys.contains(&key) {
            log::debug!("{} ({}) is already in the working set", key, id.code);
            bindings.insert(id.code, key);
            continue;
        }

        let at = records[kept..]
            .iter()
            .position(|r| {
                r.matches(&id.code)
                    && !bound_codes(&bindings, r).any(|code| candidate.record.matches(code))
            })
            .map_or(records.len(), |i| kept + i);
        log::debug!(
            "Adding reference row {} for {} at position {}",
            candidate.row,
            id.code,
            at
        );
        records.insert(at, candidate.record.clone());
        keys.insert(key.clone());
        bindings.insert(id.code.clone(), key);
        added.push(AddedAirport {
            identifier: id.code,
            reference_row: candidate.row,
        });
    }

    let working = WorkingAirportSet::with_bindings(records, bindings);
    working.verify_unique()?;
    log::info!(
        "Working set now holds {} airports ({} added, {} unresolved)",
        working.len(),
        added.len(),
        unresolved.len()
    );

    Ok(Reconciliation {
        working,
        added,
        unresolved,
    })
}

/// Identifiers already resolved to `record`.
fn bound_codes<'b>(
    bindings: &'b HashMap<String, IdentityKey>,
    record: &AirportRecord,
) -> impl Iterator<Item = &'b str> {
    let key = record.identity_key();
    bindings
        .iter()
        .filter(move |(_, bound)| **bound == key)
        .map(|(code, _)| code.as_str())
}
