//! SHA-256 fingerprint of a cohort table.

use csv::{QuoteStyle, WriterBuilder};
use polars::prelude::*;
use sha2::{Digest, Sha256};

use cohort_ingest::any_to_string;

use crate::cohort::Cohort;
use crate::error::Result;

/// Trailing field of the canonical form marking which cells are null.
const NULL_MASK_FIELD: &str = "__nulls";

/// Hex SHA-256 of the table in canonical CSV form.
///
/// The canonical form is RFC 4180 CSV with every field quoted. Each row
/// ends with a mask field holding one `1` per null cell and `0` otherwise,
/// so a null never hashes like an empty string.
pub fn frame_digest(df: &DataFrame) -> Result<String> {
    let mut hasher = Sha256::new();
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(&mut hasher);

    let mut header: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    header.push(NULL_MASK_FIELD.to_string());
    writer.write_record(&header)?;

    let columns = df.get_columns();
    let mut cells = Vec::with_capacity(columns.len() + 1);
    for idx in 0..df.height() {
        cells.clear();
        let mut mask = String::with_capacity(columns.len());
        for column in columns {
            match column.get(idx)? {
                AnyValue::Null => {
                    mask.push('1');
                    cells.push(String::new());
                }
                value => {
                    mask.push('0');
                    cells.push(any_to_string(value));
                }
            }
        }
        cells.push(mask);
        writer.write_record(&cells)?;
    }
    writer.flush()?;
    drop(writer);
    Ok(hex::encode(hasher.finalize()))
}

/// Fingerprint of the cohort's output table.
pub fn cohort_digest(cohort: &Cohort) -> Result<String> {
    frame_digest(cohort.data())
}
