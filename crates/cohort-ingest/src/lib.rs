//! Survey data ingestion utilities.
//!
//! This crate loads a DHS survey extract (CSV) into a Polars DataFrame and
//! parses the accompanying variable schema file.
//!
//! # Features
//!
//! - **CSV Loading**: header validation, encoding checks, missing-value tokens
//! - **Schema Loading**: `Name` / `Type` / `Recoded` rows into [`SchemaEntry`] values
//! - **Cell Access**: strict numeric extraction from `AnyValue` cells
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use cohort_ingest::{load_schema, read_csv_table};
//!
//! let (df, headers) = read_csv_table(Path::new("data/births.csv"))?;
//! let schema = load_schema(Path::new("data/variables.csv"))?;
//! ```
//!
//! [`SchemaEntry`]: cohort_model::SchemaEntry

mod error;
mod schema;
mod table;
pub mod values;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use table::{
    CsvHeaders, MAX_CSV_FILE_SIZE, MISSING_TOKENS, check_file_size, check_file_size_with_limit,
    normalize_header, read_csv_schema, read_csv_table, validate_dataframe_shape,
    validate_encoding,
};

// === Schema Loading ===
pub use schema::{load_schema, parse_recoded_flag};

// === Cell Access ===
pub use values::{any_to_number, any_to_string, format_numeric, parse_f64};
