//! Loading uploaded outcome data and exporting generated samples.
//!
//! # Format
//!
//! Uploaded files are CSV with a header row. The `converted` column is
//! required and every value in it must be `0` or `1` (`0.0` and `1.0` are
//! accepted as numeric spellings). Other columns are ignored.
//!
//! ```csv
//! user_id,converted
//! 0,1
//! 1,0
//! ```
//!
//! Exported files carry `user_id,group,converted`, with user ids running on
//! from the control group into the treatment group.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{AbTestError, Result};
use crate::sample::Sample;

/// Name of the required outcome column.
pub const CONVERTED_COLUMN: &str = "converted";

fn parse_outcome(raw: &str) -> Option<bool> {
    match raw {
        "0" | "0.0" => Some(false),
        "1" | "1.0" => Some(true),
        _ => None,
    }
}

/// Read a sample from the `converted` column of CSV data.
///
/// # Errors
/// Returns `Validation` if the column is missing or any row holds a missing
/// or non-binary value, and `Csv`/`Io` if the data cannot be read at all.
pub fn load_converted_csv<R: Read>(reader: R) -> Result<Sample> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.byte_headers()?.clone();
    let column = headers
        .iter()
        .position(|h| h == CONVERTED_COLUMN.as_bytes())
        .ok_or_else(|| AbTestError::Validation {
            row: 0,
            message: format!(
                "missing required `{}` column (found: {})",
                CONVERTED_COLUMN,
                headers
                    .iter()
                    .map(String::from_utf8_lossy)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        })?;

    let mut values = Vec::new();
    for (i, record) in rdr.byte_records().enumerate() {
        let record = record?;
        let row = i + 1;

        let raw = match record.get(column) {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                return Err(AbTestError::Validation {
                    row,
                    message: format!("missing `{}` value", CONVERTED_COLUMN),
                })
            }
        };

        let value = std::str::from_utf8(raw)
            .ok()
            .and_then(parse_outcome)
            .ok_or_else(|| AbTestError::Validation {
                row,
                message: format!(
                    "`{}` must be 0 or 1, got \"{}\"",
                    CONVERTED_COLUMN,
                    raw.escape_ascii()
                ),
            })?;
        values.push(value);
    }

    Ok(Sample::new(values))
}

/// Read a sample from a CSV file. See [`load_converted_csv`].
pub fn load_converted_csv_path(path: &Path) -> Result<Sample> {
    let file = File::open(path)?;
    load_converted_csv(file)
}

/// Write both samples as one CSV table.
pub fn write_samples_csv<W: Write>(writer: W, control: &Sample, treatment: &Sample) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["user_id", "group", CONVERTED_COLUMN])?;

    let rows = control
        .values()
        .iter()
        .map(|&v| ("control", v))
        .chain(treatment.values().iter().map(|&v| ("treatment", v)));

    for (user_id, (group, converted)) in rows.enumerate() {
        let user_id = user_id.to_string();
        let converted = if converted { "1" } else { "0" };
        wtr.write_record([user_id.as_str(), group, converted])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write both samples to a CSV file. See [`write_samples_csv`].
pub fn write_samples_csv_path(path: &Path, control: &Sample, treatment: &Sample) -> Result<()> {
    let file = File::create(path)?;
    write_samples_csv(file, control, treatment)
}
