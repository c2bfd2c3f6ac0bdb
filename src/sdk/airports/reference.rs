use super::error::AirportError;
use super::record::{AirportRecord, REQUIRED_COLUMNS};
use csv::{ReaderBuilder, Trim};
use std::{collections::HashMap, fs::File, io::Read, path::Path};

/// The canonical airport table, read once per run and never modified.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    records: Vec<AirportRecord>,
    // code -> rows whose local_code or iata_code equals it
    by_code: HashMap<String, Vec<usize>>,
}

impl ReferenceTable {
    pub fn new(records: Vec<AirportRecord>) -> Self {
        let mut by_code: HashMap<String, Vec<usize>> = HashMap::new();
        for (row, record) in records.iter().enumerate() {
            for code in record.codes() {
                by_code.entry(code.to_string()).or_default().push(row);
            }
        }
        Self { records, by_code }
    }

    /// Loads the table from a CSV file with at least the
    /// `local_code`, `iata_code` and `coordinates` columns.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AirportError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let table = Self::from_reader(file, &path.display().to_string())?;
        log::info!(
            "Loaded {} reference airports from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R, source: &str) -> Result<Self, AirportError> {
        Ok(Self::new(read_airport_csv(reader, source)?))
    }

    /// Row numbers of every record with `identifier` as a code, ascending.
    pub fn rows_matching(&self, identifier: &str) -> &[usize] {
        self.by_code
            .get(identifier)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn get(&self, row: usize) -> Option<&AirportRecord> {
        self.records.get(row)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reads airport rows from CSV, failing early if a required column is absent.
/// Unknown columns are ignored and missing descriptive columns become empty.
pub(crate) fn read_airport_csv<R: Read>(
    reader: R,
    source: &str,
) -> Result<Vec<AirportRecord>, AirportError> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(AirportError::MissingColumn {
                path: source.to_string(),
                column,
            });
        }
    }

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: AirportRecord = result?;
        records.push(record);
    }
    Ok(records)
}
