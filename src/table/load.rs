// src/table/load.rs

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::DatasetError;
use crate::record::{
    is_well_formed_iso, normalize_iso, parse_bool, parse_code, parse_coord, CountryRecord,
};

/// Column order of the dataset file. The header row must match exactly.
pub const EXPECTED_HEADERS: [&str; 11] = [
    "region",
    "subregion",
    "country",
    "iso2",
    "iso3",
    "m49",
    "m49_comtrade",
    "latitude",
    "longitude",
    "ldc",
    "non_country_region",
];

/// Parse the delimited dataset into records, validating per-record
/// invariants as rows arrive. Uniqueness across records is enforced by the
/// caller when the indexes are built.
pub fn parse_records<R: std::io::Read>(reader: R) -> Result<Vec<CountryRecord>, DatasetError> {
    // Flexible so a wrong field count surfaces as our own row error with a
    // line number instead of a csv-internal one.
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = rdr.records();
    let header = match rows.next() {
        Some(rec) => rec?,
        None => return Err(DatasetError::MissingHeader),
    };
    if header.iter().map(str::trim).ne(EXPECTED_HEADERS) {
        return Err(DatasetError::HeaderMismatch {
            expected: EXPECTED_HEADERS.iter().map(|s| s.to_string()).collect(),
            got: header.iter().map(|s| s.to_string()).collect(),
        });
    }

    let mut records = Vec::new();
    for rec in rows {
        let rec = rec?;
        let line = rec.position().map(|p| p.line()).unwrap_or(0);
        let record = parse_row(&rec, line)?;
        validate_record(&record)?;
        records.push(record);
    }

    debug!("parsed {} country records", records.len());
    Ok(records)
}

fn parse_row(rec: &StringRecord, line: u64) -> Result<CountryRecord, DatasetError> {
    if rec.len() != EXPECTED_HEADERS.len() {
        return Err(DatasetError::MalformedRow {
            line,
            reason: format!(
                "expected {} fields, got {}",
                EXPECTED_HEADERS.len(),
                rec.len()
            ),
        });
    }

    let malformed = |reason: String| DatasetError::MalformedRow { line, reason };

    let m49 = parse_code(&rec[5])
        .ok_or_else(|| malformed(format!("invalid m49 code `{}`", &rec[5])))?;
    let m49_comtrade = parse_code(&rec[6])
        .ok_or_else(|| malformed(format!("invalid m49_comtrade code `{}`", &rec[6])))?;
    let latitude = parse_coord(&rec[7])
        .map_err(|_| malformed(format!("invalid latitude `{}`", &rec[7])))?;
    let longitude = parse_coord(&rec[8])
        .map_err(|_| malformed(format!("invalid longitude `{}`", &rec[8])))?;
    let ldc =
        parse_bool(&rec[9]).ok_or_else(|| malformed(format!("invalid ldc flag `{}`", &rec[9])))?;
    let non_country_region = parse_bool(&rec[10]).ok_or_else(|| {
        malformed(format!("invalid non_country_region flag `{}`", &rec[10]))
    })?;

    Ok(CountryRecord {
        region: rec[0].trim().to_string(),
        subregion: rec[1].trim().to_string(),
        country: rec[2].trim().to_string(),
        iso2: normalize_iso(&rec[3]),
        iso3: normalize_iso(&rec[4]),
        m49,
        m49_comtrade,
        latitude,
        longitude,
        ldc,
        non_country_region,
    })
}

/// Structural invariants that hold per record: aggregate regions have no ISO
/// codes and no centroid; every other record carries well-formed alpha-2 and
/// alpha-3 codes.
fn validate_record(rec: &CountryRecord) -> Result<(), DatasetError> {
    let violation = |reason: &str| DatasetError::InvariantViolation {
        country: rec.country.clone(),
        reason: reason.to_string(),
    };

    if rec.non_country_region {
        if !rec.iso2.is_empty() || !rec.iso3.is_empty() {
            return Err(violation("aggregate region must not carry ISO codes"));
        }
        if rec.latitude.is_some() || rec.longitude.is_some() {
            return Err(violation("aggregate region must not carry a centroid"));
        }
    } else {
        if !is_well_formed_iso(&rec.iso2, 2) {
            return Err(violation("country record needs a 2-letter ISO2 code"));
        }
        if !is_well_formed_iso(&rec.iso3, 3) {
            return Err(violation("country record needs a 3-letter ISO3 code"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::CodeTable;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str =
        "region,subregion,country,iso2,iso3,m49,m49_comtrade,latitude,longitude,ldc,non_country_region";

    fn one_row(row: &str) -> Result<Vec<CountryRecord>, DatasetError> {
        let csv = format!("{HEADER}\n{row}\n");
        parse_records(csv.as_bytes())
    }

    #[test]
    fn parses_a_country_row() {
        let recs =
            one_row("Europe,Western Europe,France,fr,fra,250,251,46.2276,2.2137,false,false")
                .unwrap();
        assert_eq!(recs.len(), 1);
        let r = &recs[0];
        assert_eq!(r.iso2, "FR");
        assert_eq!(r.iso3, "FRA");
        assert_eq!(r.m49, 250);
        assert_eq!(r.m49_comtrade, 251);
        assert_eq!(r.latitude, Some(46.2276));
        assert!(!r.ldc);
    }

    #[test]
    fn parses_an_aggregate_row() {
        let recs = one_row("Europe,,NES,,,568,568,,,false,true").unwrap();
        let r = &recs[0];
        assert!(r.non_country_region);
        assert!(r.iso2.is_empty());
        assert_eq!(r.latitude, None);
    }

    #[test]
    fn accepts_pandas_booleans_and_padded_codes() {
        let recs =
            one_row("Asia,Southern Asia,Afghanistan,AF,AFG,004,004,33.9,67.7,True,False").unwrap();
        assert_eq!(recs[0].m49, 4);
        assert!(recs[0].ldc);
    }

    #[test]
    fn rejects_wrong_field_count() {
        let err = one_row("Europe,Western Europe,France,FR,FRA,250,251").unwrap_err();
        assert!(matches!(err, DatasetError::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn rejects_bad_tokens() {
        for row in [
            "Europe,Western Europe,France,FR,FRA,abc,251,46.2,2.2,false,false",
            "Europe,Western Europe,France,FR,FRA,250,,46.2,2.2,false,false",
            "Europe,Western Europe,France,FR,FRA,250,251,north,2.2,false,false",
            "Europe,Western Europe,France,FR,FRA,250,251,46.2,2.2,maybe,false",
        ] {
            let err = one_row(row).unwrap_err();
            assert!(matches!(err, DatasetError::MalformedRow { .. }), "{row}");
        }
    }

    #[test]
    fn rejects_invariant_violations() {
        // Aggregate with an ISO code.
        let err = one_row("Europe,,NES,EU,,568,568,,,false,true").unwrap_err();
        assert!(matches!(err, DatasetError::InvariantViolation { .. }));

        // Country without ISO codes.
        let err =
            one_row("Europe,Western Europe,France,,,250,251,46.2,2.2,false,false").unwrap_err();
        assert!(matches!(err, DatasetError::InvariantViolation { .. }));

        // Malformed ISO3.
        let err =
            one_row("Europe,Western Europe,France,FR,FR1,250,251,46.2,2.2,false,false")
                .unwrap_err();
        assert!(matches!(err, DatasetError::InvariantViolation { .. }));
    }

    #[test]
    fn rejects_missing_or_wrong_header() {
        assert!(matches!(
            parse_records("".as_bytes()).unwrap_err(),
            DatasetError::MissingHeader
        ));
        assert!(matches!(
            parse_records("a,b,c\n1,2,3\n".as_bytes()).unwrap_err(),
            DatasetError::HeaderMismatch { .. }
        ));
    }

    #[test]
    fn quoted_fields_are_handled() {
        let recs = one_row(
            "Americas,Latin America and the Caribbean,\"Bonaire, Sint Eustatius and Saba\",BQ,BES,535,535,12.18,-68.24,false,false",
        )
        .unwrap();
        assert_eq!(recs[0].country, "Bonaire, Sint Eustatius and Saba");
    }

    #[test]
    fn load_path_reads_a_file() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "{HEADER}").unwrap();
        writeln!(
            f,
            "Europe,Northern Europe,Norway,NO,NOR,578,579,60.472,8.4689,false,false"
        )
        .unwrap();

        let table = CodeTable::load_path(f.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.by_iso2("no").unwrap().country, "Norway");
    }

    #[test]
    fn load_path_missing_file_is_io_error() {
        let err = CodeTable::load_path("/nonexistent/countries.csv").unwrap_err();
        assert!(matches!(err, DatasetError::Io(_)));
    }
}
