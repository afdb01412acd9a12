//! Configuration options for cohort building.

use serde::{Deserialize, Serialize};

use crate::columns::SourceColumns;

/// Oldest age, in months, a retained child may have.
pub const DEFAULT_MAX_AGE_MONTHS: i64 = 59;

/// Options controlling how a cohort is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortOptions {
    /// Physical names of the survey columns the pipeline reads.
    pub source_columns: SourceColumns,

    /// Upper bound (inclusive) for `age_child_month`.
    ///
    /// DHS birth histories for mortality cover the five years before the
    /// interview, so any larger value is a data error.
    pub max_age_months: i64,
}

impl Default for CohortOptions {
    fn default() -> Self {
        Self {
            source_columns: SourceColumns::default(),
            max_age_months: DEFAULT_MAX_AGE_MONTHS,
        }
    }
}

impl CohortOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options preconfigured for DHS birth recode variable names.
    pub fn dhs_recode() -> Self {
        Self::default().with_source_columns(SourceColumns::dhs_recode())
    }

    #[must_use]
    pub fn with_source_columns(mut self, columns: SourceColumns) -> Self {
        self.source_columns = columns;
        self
    }

    #[must_use]
    pub fn with_max_age_months(mut self, months: i64) -> Self {
        self.max_age_months = months;
        self
    }
}
