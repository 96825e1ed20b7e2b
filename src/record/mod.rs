// src/record/mod.rs

use serde::{Deserialize, Serialize};

/// One row of the country dataset.
///
/// `m49` is the UN-published numeric code; `m49_comtrade` is the code as it
/// appears in Comtrade source data. They agree for every record except
/// France, Norway, India, Switzerland and the United States, where Comtrade
/// kept an older administrative code.
///
/// Aggregate statistical categories (NES, Bunkers, Free Zones, Special
/// Categories) carry `non_country_region = true` and have no ISO codes or
/// centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub region: String,
    pub subregion: String,
    pub country: String,
    pub iso2: String,
    pub iso3: String,
    pub m49: u32,
    pub m49_comtrade: u32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ldc: bool,
    pub non_country_region: bool,
}

impl CountryRecord {
    /// True when both centroid coordinates are present.
    pub fn has_centroid(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Parse a boolean token. Accepts `true`/`false` case-insensitively (the
/// distributed file is pandas output and carries `True`/`False`) as well as
/// `1`/`0`. The canonical written form is lowercase `true`/`false`.
pub fn parse_bool(field: &str) -> Option<bool> {
    match field.trim() {
        "1" => Some(true),
        "0" => Some(false),
        s if s.eq_ignore_ascii_case("true") => Some(true),
        s if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

/// Parse an M49 code, plain or zero-padded (`4` and `004` are the same
/// code). Codes are written back plain.
pub fn parse_code(field: &str) -> Option<u32> {
    let s = field.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse a coordinate field; the empty string denotes a missing centroid.
pub fn parse_coord(field: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let s = field.trim();
    if s.is_empty() {
        return Ok(None);
    }
    s.parse().map(Some)
}

/// Normalize an ISO code for indexing and querying: trimmed, uppercased.
pub fn normalize_iso(field: &str) -> String {
    field.trim().to_ascii_uppercase()
}

/// True for a well-formed ISO 3166-1 code of the given length (uppercase
/// ASCII letters only). Assumes the input has already been normalized.
pub fn is_well_formed_iso(code: &str, len: usize) -> bool {
    code.len() == len && code.bytes().all(|b| b.is_ascii_uppercase())
}
