//! Ingest
//!
//! Reads categorical records from delimited text and tallies them into a
//! [`ContingencyTable`]. This is the boundary where raw text fields are
//! checked; the numeric code never sees a malformed record.
use crate::contingency::ContingencyTable;
use crate::errors::ChiSquaredError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One quality-assurance record: the shift that produced a defect and its type.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DefectRecord {
    pub shift: String,
    #[serde(default)]
    pub defect_type: String,
    #[serde(default)]
    pub serial_number: String,
}

/// Adds one observation of the trimmed `(row, column)` pair. Returns false,
/// leaving the table untouched, when either value is blank.
fn tally(table: &mut ContingencyTable<String, String>, row: &str, column: &str) -> bool {
    let (row, column) = (row.trim(), column.trim());
    if row.is_empty() || column.is_empty() {
        return false;
    }
    table.add(row.to_string(), column.to_string(), 1);
    true
}

/// Tally `(shift, defect_type)` pairs from a headed CSV stream.
///
/// Values are trimmed. Rows with a blank `defect_type` are not defects and
/// rows with a blank `shift` can't be placed; both are skipped.
pub fn read_defects<R: Read>(reader: R) -> Result<ContingencyTable<String, String>, ChiSquaredError> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut table = ContingencyTable::new();
    let mut skipped = 0usize;
    for result in csv_reader.deserialize() {
        let record: DefectRecord = result?;
        if !tally(&mut table, &record.shift, &record.defect_type) {
            skipped += 1;
        }
    }
    if skipped > 0 {
        debug!("Skipped {} records with a blank shift or defect type.", skipped);
    }
    info!(
        "Read {} defects across {} shifts.",
        table.grand_total(),
        table.row_labels().count()
    );
    Ok(table)
}

/// [`read_defects`] from a file on disk.
pub fn read_defects_path<P: AsRef<Path>>(path: P) -> Result<ContingencyTable<String, String>, ChiSquaredError> {
    let file = File::open(path)?;
    read_defects(BufReader::new(file))
}

/// Tally the values of two named columns from a headed CSV stream.
///
/// Values are trimmed and a row where either value is blank is skipped.
/// * `row_column` - Header of the column used as the row category.
/// * `column_column` - Header of the column used as the column category.
pub fn read_pairs<R: Read>(
    reader: R,
    row_column: &str,
    column_column: &str,
) -> Result<ContingencyTable<String, String>, ChiSquaredError> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ChiSquaredError::MissingColumn(name.to_string()))
    };
    let row_index = position(row_column)?;
    let column_index = position(column_column)?;

    let mut table = ContingencyTable::new();
    let mut skipped = 0usize;
    for result in csv_reader.records() {
        let record = result?;
        let row = record.get(row_index).unwrap_or("");
        let column = record.get(column_index).unwrap_or("");
        if !tally(&mut table, row, column) {
            skipped += 1;
        }
    }
    if skipped > 0 {
        debug!("Skipped {} records with a blank {} or {}.", skipped, row_column, column_column);
    }
    Ok(table)
}
