//! Data model for the DHS child-mortality cohort builder.
//!
//! Plain types shared by the ingest, pipeline and CLI crates:
//!
//! - **schema**: variable schema entries and their column resolution
//! - **columns**: physical source column names and derived output columns
//! - **endpoint**: the under-5 / under-1 study endpoints
//! - **options**: cohort build configuration
//! - **design**: the time/event/covariate handoff to a survival estimator
//! - **report**: diagnostic counts and summaries

pub mod columns;
pub mod design;
pub mod endpoint;
pub mod options;
pub mod report;
pub mod schema;

pub use columns::{AGE_CHILD_MONTH, DERIVED_COLUMNS, IS_DIED, SourceColumns, is_derived_column};
pub use design::SurvivalDesign;
pub use endpoint::Endpoint;
pub use options::{CohortOptions, DEFAULT_MAX_AGE_MONTHS};
pub use report::{
    AgeSummary, BuildReport, EndpointSummary, FlagCount, FlagCrosstab, PipelineStage,
    StageCount,
};
pub use schema::{RECODED_SUFFIX, SchemaEntry, VariableKind};
