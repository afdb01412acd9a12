//! Cohort builder for DHS child-mortality survival analysis.
//!
//! Turns a survey birth table plus its variable schema into an
//! analysis-ready cohort: quality-flagged records removed, one integer age
//! per child, and a 0/1 event indicator for each mortality endpoint.
//!
//! # Pipeline
//!
//! 1. Column selection driven by the schema
//! 2. Death-flag quality filter
//! 3. Raw age-at-death removal
//! 4. Unknown-age filter
//! 5. Vital status
//! 6. Age derivation through a [`FallbackChain`]
//! 7. Source column removal
//! 8. Censoring indicators
//! 9. Final projection
//!
//! # Example
//!
//! ```ignore
//! use cohort_core::{CohortDesign, build_cohort};
//! use cohort_model::{CohortOptions, Endpoint, SurvivalDesign};
//!
//! let cohort = build_cohort(records, &schema, &CohortOptions::dhs_recode())?;
//! let design = SurvivalDesign::all_covariates(&cohort, Endpoint::U5);
//! println!("{}", design.formula());
//! ```

mod cohort;
mod design;
mod diagnostics;
mod digest;
mod error;
pub mod projection;
mod resolve;
pub mod steps;

pub use cohort::{Cohort, build_cohort, build_cohort_with_report};
pub use design::{CohortDesign, strata};
pub use diagnostics::{age_summary, endpoint_summary, flag_crosstab};
pub use digest::{cohort_digest, frame_digest};
pub use error::{CohortError, Result};
pub use resolve::{FallbackChain, NumericSource, Resolved};
