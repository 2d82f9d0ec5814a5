//! CSV import/export of catalog rows.
//!
//! Columns: `name, weight, calories, carbs, protein, fat, avgShelfLife,
//! pieceWeight`. The first four must be present in the header.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim, WriterBuilder};

use crate::catalog::dto::ImportRow;

pub const COLUMNS: [&str; 8] = [
    "name",
    "weight",
    "calories",
    "carbs",
    "protein",
    "fat",
    "avgShelfLife",
    "pieceWeight",
];
const REQUIRED_COLUMNS: usize = 4;

const SAMPLE_ROW: [&str; 8] = ["onion", "100", "40", "9", "1", "0", "21", "200"];

pub fn read_rows<R: Read>(reader: R) -> Result<Vec<ImportRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("read header row")?.clone();
    for col in &COLUMNS[..REQUIRED_COLUMNS] {
        if !headers.iter().any(|h| h == *col) {
            anyhow::bail!("Column '{}' not found", col);
        }
    }

    let mut rows = Vec::new();
    for (idx, result) in rdr.deserialize::<ImportRow>().enumerate() {
        let row = result.with_context(|| format!("Failed to read row {}", idx + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn read_rows_from_path(path: &Path) -> Result<Vec<ImportRow>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open spreadsheet at {:?}", path))?;
    read_rows(file)
}

/// Write the header and one illustrative row.
pub fn write_sample<W: Write>(writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(COLUMNS).context("write sample header")?;
    wtr.write_record(SAMPLE_ROW).context("write sample row")?;
    wtr.flush().context("flush sample")?;
    Ok(())
}

pub fn write_sample_to_path(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create sample spreadsheet at {:?}", path))?;
    write_sample(file)
}
