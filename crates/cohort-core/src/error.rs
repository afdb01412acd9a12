//! Error taxonomy for cohort building.

use thiserror::Error;

/// Errors that abort a cohort build.
#[derive(Debug, Error)]
pub enum CohortError {
    /// A required column cannot be resolved against the input table.
    #[error("schema mismatch for column '{column}': {reason}")]
    SchemaMismatch { column: String, reason: String },

    /// A record reached age derivation with no age source.
    #[error("record {row} has no resolvable age")]
    IncompleteRecord { row: usize },

    /// A value does not fit the expected shape or domain.
    #[error("malformed input in column '{column}'{}: {reason}", row_suffix(.row))]
    MalformedInput {
        row: Option<usize>,
        column: String,
        reason: String,
    },

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    /// The cohort could not be written in canonical form.
    #[error("failed to serialize cohort: {message}")]
    Serialize { message: String },
}

fn row_suffix(row: &Option<usize>) -> String {
    row.map(|row| format!(" at row {row}")).unwrap_or_default()
}

impl CohortError {
    pub fn schema_mismatch(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            column: column.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed(
        row: Option<usize>,
        column: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedInput {
            row,
            column: column.into(),
            reason: reason.into(),
        }
    }
}

impl From<polars::prelude::PolarsError> for CohortError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for CohortError {
    fn from(err: csv::Error) -> Self {
        Self::Serialize {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for CohortError {
    fn from(err: std::io::Error) -> Self {
        Self::Serialize {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CohortError>;
