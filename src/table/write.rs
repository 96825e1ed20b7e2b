// src/table/write.rs

use csv::WriterBuilder;
use std::{fs, io::Write, path::Path};

use super::CodeTable;
use crate::error::DatasetError;
use crate::record::CountryRecord;

/// Serialize records to the canonical delimited encoding: the fixed column
/// order with a header row, lowercase `true`/`false` booleans, plain
/// (unpadded) integer codes, and the empty string for a missing centroid.
/// Loading the output yields a field-for-field identical record set.
pub fn write_records<'a, W, I>(writer: W, records: I) -> Result<(), DatasetError>
where
    W: Write,
    I: IntoIterator<Item = &'a CountryRecord>,
{
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(writer);
    for rec in records {
        wtr.serialize(rec)?;
    }
    wtr.flush()?;
    Ok(())
}

impl CodeTable {
    /// Write the whole table (aggregates included) in the canonical
    /// encoding.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), DatasetError> {
        write_records(writer, self.all(true))
    }

    /// Write the table to `path`, via a temp file renamed into place so a
    /// failed write never leaves a truncated dataset behind.
    pub fn write_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<(), DatasetError> {
        let path = path.as_ref();
        let tmp = path.with_extension("csv.tmp");
        let file = fs::File::create(&tmp)?;
        self.write_csv(file)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}
