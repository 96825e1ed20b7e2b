pub mod load;
pub mod write;

pub use load::EXPECTED_HEADERS;
pub use write::write_records;

use once_cell::sync::Lazy;
use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

use crate::error::{DatasetError, LookupError, LookupKind};
use crate::record::{normalize_iso, CountryRecord};

/// The packaged dataset, compiled into the binary.
static BUILTIN_CSV: &str = include_str!("../../data/countries.csv");

static BUILTIN: Lazy<CodeTable> = Lazy::new(|| {
    CodeTable::load_reader(BUILTIN_CSV.as_bytes()).expect("packaged countries.csv is valid")
});

/// Immutable, indexed view of the country dataset.
///
/// Built once from a CSV source, then read-only: lookups are O(1) via four
/// index maps (ISO2, ISO3, M49, Comtrade M49). A loaded table has no
/// interior mutability and can be shared across threads without locking.
#[derive(Debug)]
pub struct CodeTable {
    records: Vec<CountryRecord>,
    by_iso2: HashMap<String, usize>,
    by_iso3: HashMap<String, usize>,
    by_m49: HashMap<u32, usize>,
    by_m49_comtrade: HashMap<u32, usize>,
}

impl CodeTable {
    /// The table for the dataset packaged with this crate, parsed once per
    /// process. Explicitly loaded tables (`load_path`, `load_reader`) are
    /// independent of this instance.
    pub fn builtin() -> &'static CodeTable {
        &BUILTIN
    }

    /// Load a dataset from a CSV file on disk.
    pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = File::open(path.as_ref())?;
        Self::load_reader(BufReader::new(file))
    }

    /// Load a dataset from any reader producing the delimited format
    /// described in the crate docs. Fails on the first malformed row or
    /// violated uniqueness invariant; no partial table is ever returned.
    pub fn load_reader<R: std::io::Read>(reader: R) -> Result<Self, DatasetError> {
        let records = load::parse_records(reader)?;
        Self::from_records(records)
    }

    /// Index an already-parsed record list, enforcing code uniqueness.
    fn from_records(records: Vec<CountryRecord>) -> Result<Self, DatasetError> {
        let mut by_iso2 = HashMap::new();
        let mut by_iso3 = HashMap::new();
        let mut by_m49 = HashMap::new();
        let mut by_m49_comtrade = HashMap::new();

        for (idx, rec) in records.iter().enumerate() {
            // Row 1 is the header, so data row N sits on line N + 1.
            let line = idx as u64 + 2;

            if by_m49.insert(rec.m49, idx).is_some() {
                return Err(DatasetError::DuplicateCode {
                    line,
                    kind: LookupKind::M49,
                    code: rec.m49.to_string(),
                });
            }
            if by_m49_comtrade.insert(rec.m49_comtrade, idx).is_some() {
                return Err(DatasetError::DuplicateCode {
                    line,
                    kind: LookupKind::M49Comtrade,
                    code: rec.m49_comtrade.to_string(),
                });
            }
            // ISO keys are only indexed when present; aggregate regions
            // have none and are unreachable through the ISO maps.
            if !rec.iso2.is_empty() && by_iso2.insert(rec.iso2.clone(), idx).is_some() {
                return Err(DatasetError::DuplicateCode {
                    line,
                    kind: LookupKind::Iso2,
                    code: rec.iso2.clone(),
                });
            }
            if !rec.iso3.is_empty() && by_iso3.insert(rec.iso3.clone(), idx).is_some() {
                return Err(DatasetError::DuplicateCode {
                    line,
                    kind: LookupKind::Iso3,
                    code: rec.iso3.clone(),
                });
            }
        }

        Ok(Self {
            records,
            by_iso2,
            by_iso3,
            by_m49,
            by_m49_comtrade,
        })
    }

    /// Look up by ISO 3166-1 alpha-2 code, case-insensitively.
    pub fn by_iso2(&self, code: &str) -> Result<&CountryRecord, LookupError> {
        let key = normalize_iso(code);
        if key.is_empty() {
            return Err(LookupError::not_found(LookupKind::Iso2, key));
        }
        self.by_iso2
            .get(&key)
            .map(|&i| &self.records[i])
            .ok_or_else(|| LookupError::not_found(LookupKind::Iso2, key))
    }

    /// Look up by ISO 3166-1 alpha-3 code, case-insensitively.
    pub fn by_iso3(&self, code: &str) -> Result<&CountryRecord, LookupError> {
        let key = normalize_iso(code);
        if key.is_empty() {
            return Err(LookupError::not_found(LookupKind::Iso3, key));
        }
        self.by_iso3
            .get(&key)
            .map(|&i| &self.records[i])
            .ok_or_else(|| LookupError::not_found(LookupKind::Iso3, key))
    }

    /// Look up by the UN-published M49 code.
    pub fn by_m49(&self, code: u32) -> Result<&CountryRecord, LookupError> {
        self.by_m49
            .get(&code)
            .map(|&i| &self.records[i])
            .ok_or_else(|| LookupError::not_found(LookupKind::M49, code.to_string()))
    }

    /// Look up by the M49 code as used in Comtrade source data.
    pub fn by_m49_comtrade(&self, code: u32) -> Result<&CountryRecord, LookupError> {
        self.by_m49_comtrade
            .get(&code)
            .map(|&i| &self.records[i])
            .ok_or_else(|| LookupError::not_found(LookupKind::M49Comtrade, code.to_string()))
    }

    /// Iterate over the table in dataset order. The iterator is restartable:
    /// every call starts from the first record. With
    /// `include_non_country_regions = false` the aggregate statistical
    /// categories are skipped.
    pub fn all(
        &self,
        include_non_country_regions: bool,
    ) -> impl Iterator<Item = &CountryRecord> + '_ {
        self.records
            .iter()
            .filter(move |r| include_non_country_regions || !r.non_country_region)
    }

    /// Iterate over actual countries only, excluding aggregate regions.
    pub fn countries_only(&self) -> impl Iterator<Item = &CountryRecord> + '_ {
        self.all(false)
    }

    /// Total number of records, aggregates included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
