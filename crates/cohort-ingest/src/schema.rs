//! Variable schema file loading.
//!
//! The schema file is a small CSV with one row per survey variable and the
//! columns `Name`, `Type` and `Recoded`. Header matching is case-insensitive
//! and accepts a few common spellings for each column.

use std::collections::BTreeSet;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;

use cohort_model::{SchemaEntry, VariableKind};

use crate::error::{IngestError, Result};

const SCHEMA_COLUMN_NAME: &[&str] = &["name", "variable", "var"];
const SCHEMA_COLUMN_TYPE: &[&str] = &["type", "kind", "role"];
const SCHEMA_COLUMN_RECODED: &[&str] = &["recoded", "recode", "is_recoded"];

#[derive(Debug, Deserialize)]
struct SchemaRow {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    recoded: Option<String>,
}

/// Maps a raw header cell onto the canonical field name it stands for.
fn canonical_header(raw: &str) -> String {
    let lowered = raw.trim().trim_matches('\u{feff}').trim().to_ascii_lowercase();
    for (canonical, aliases) in [
        ("name", SCHEMA_COLUMN_NAME),
        ("type", SCHEMA_COLUMN_TYPE),
        ("recoded", SCHEMA_COLUMN_RECODED),
    ] {
        if aliases.contains(&lowered.as_str()) {
            return canonical.to_string();
        }
    }
    lowered
}

/// Parses a `Recoded` cell.
///
/// Accepts the spellings produced by spreadsheet and dataframe exports;
/// a blank cell means not recoded.
pub fn parse_recoded_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "f" | "no" | "n" | "0" => Some(false),
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        _ => None,
    }
}

/// Loads the variable schema from a CSV file.
///
/// Rows with a blank name are skipped. When a variable is listed more than
/// once, the first entry wins.
pub fn load_schema(path: &Path) -> Result<Vec<SchemaEntry>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| IngestError::from_csv(path, e))?;

    let raw_headers = reader
        .headers()
        .map_err(|e| IngestError::from_csv(path, e))?
        .clone();
    if raw_headers.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    let headers: StringRecord = raw_headers.iter().map(canonical_header).collect();
    for required in ["name", "type"] {
        if !headers.iter().any(|h| h == required) {
            return Err(IngestError::MissingColumn {
                column: required.to_string(),
                path: path.to_path_buf(),
            });
        }
    }
    if !headers.iter().any(|h| h == "recoded") {
        tracing::debug!(
            path = %path.display(),
            "schema has no Recoded column; treating all variables as raw"
        );
    }
    let mut entries = Vec::new();
    let mut seen = BTreeSet::new();
    for result in reader.records() {
        let record = result.map_err(|e| IngestError::from_csv(path, e))?;
        let line = record.position().map_or(0, csv::Position::line);
        let row: SchemaRow = record
            .deserialize(Some(&headers))
            .map_err(|e| IngestError::from_csv(path, e))?;
        let name = row.name.trim().to_string();
        if name.is_empty() {
            continue;
        }
        let raw_recoded = row.recoded.unwrap_or_default();
        let recoded =
            parse_recoded_flag(&raw_recoded).ok_or_else(|| IngestError::InvalidValue {
                field: "Recoded".to_string(),
                value: raw_recoded.clone(),
                line,
                path: path.to_path_buf(),
            })?;
        if !seen.insert(name.clone()) {
            tracing::warn!(variable = %name, line, "duplicate schema entry ignored");
            continue;
        }
        entries.push(SchemaEntry::new(name, VariableKind::from_name(&row.kind), recoded));
    }

    tracing::debug!(
        path = %path.display(),
        variables = entries.len(),
        "loaded variable schema"
    );
    Ok(entries)
}
