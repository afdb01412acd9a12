//! Source and derived column names.

use serde::{Deserialize, Serialize};

use crate::endpoint::Endpoint;

/// Derived age at event or interview, in whole months.
pub const AGE_CHILD_MONTH: &str = "age_child_month";

/// Derived vital status.
pub const IS_DIED: &str = "is_died";

/// Every column the pipeline derives itself, in output order.
pub const DERIVED_COLUMNS: &[&str] = &[
    AGE_CHILD_MONTH,
    IS_DIED,
    Endpoint::U5.event_column(),
    Endpoint::U1.event_column(),
];

/// Returns true when `name` is produced by the pipeline rather than read from input.
pub fn is_derived_column(name: &str) -> bool {
    DERIVED_COLUMNS.contains(&name)
}

/// Physical names of the survey columns the pipeline reads.
///
/// Defaults to the logical names; [`SourceColumns::dhs_recode`] maps them to
/// the DHS recode variable codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceColumns {
    /// Raw age at death with units encoded in the hundreds digit (DHS `b6`).
    pub age_at_death_raw: String,
    /// Age at death in months, imputed (DHS `b7`).
    pub age_at_death_months_imputed: String,
    /// Data-quality flag for age at death (DHS `b13`).
    pub death_flag: String,
    /// Current age in months for living children (DHS `hw1`).
    pub current_age_months: String,
}

impl Default for SourceColumns {
    fn default() -> Self {
        Self {
            age_at_death_raw: "age_at_death_raw".to_string(),
            age_at_death_months_imputed: "age_at_death_months_imputed".to_string(),
            death_flag: "death_flag".to_string(),
            current_age_months: "current_age_months".to_string(),
        }
    }
}

impl SourceColumns {
    /// DHS birth recode variable codes.
    pub fn dhs_recode() -> Self {
        Self {
            age_at_death_raw: "b6".to_string(),
            age_at_death_months_imputed: "b7".to_string(),
            death_flag: "b13".to_string(),
            current_age_months: "hw1".to_string(),
        }
    }

    #[must_use]
    pub fn with_age_at_death_raw(mut self, name: impl Into<String>) -> Self {
        self.age_at_death_raw = name.into();
        self
    }

    #[must_use]
    pub fn with_age_at_death_months_imputed(mut self, name: impl Into<String>) -> Self {
        self.age_at_death_months_imputed = name.into();
        self
    }

    #[must_use]
    pub fn with_death_flag(mut self, name: impl Into<String>) -> Self {
        self.death_flag = name.into();
        self
    }

    #[must_use]
    pub fn with_current_age_months(mut self, name: impl Into<String>) -> Self {
        self.current_age_months = name.into();
        self
    }

    /// Columns that must exist in the input for the pipeline to run.
    pub fn required(&self) -> [&str; 3] {
        [
            self.death_flag.as_str(),
            self.age_at_death_months_imputed.as_str(),
            self.current_age_months.as_str(),
        ]
    }

    /// All source columns, including the optional raw age-at-death column.
    pub fn all(&self) -> [&str; 4] {
        [
            self.age_at_death_raw.as_str(),
            self.age_at_death_months_imputed.as_str(),
            self.death_flag.as_str(),
            self.current_age_months.as_str(),
        ]
    }

    pub fn contains(&self, name: &str) -> bool {
        self.all().contains(&name)
    }
}
