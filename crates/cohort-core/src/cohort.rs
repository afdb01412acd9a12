//! Cohort construction.

use polars::prelude::*;
use tracing::{debug, info, info_span, warn};

use cohort_model::{
    AGE_CHILD_MONTH, BuildReport, CohortOptions, Endpoint, PipelineStage, SchemaEntry,
    StageCount,
};

use crate::diagnostics::{age_summary, endpoint_summary, flag_crosstab};
use crate::digest::cohort_digest;
use crate::error::Result;
use crate::projection::covariate_columns;
use crate::steps::{
    RECORD_INDEX, attach_record_index, column_names, derive_age, derive_censoring,
    derive_vital_status, drop_raw_age_at_death, drop_source_columns, filter_quality_flags,
    filter_unknown_age, final_projection, select_schema_columns,
};

/// Analysis-ready cohort: one row per retained child.
#[derive(Debug, Clone)]
pub struct Cohort {
    data: DataFrame,
    covariates: Vec<String>,
}

impl Cohort {
    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn into_data(self) -> DataFrame {
        self.data
    }

    /// Covariate columns, in schema order.
    pub fn covariates(&self) -> &[String] {
        &self.covariates
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }

    pub fn has_covariate(&self, name: &str) -> bool {
        self.covariates.iter().any(|covariate| covariate == name)
    }
}

/// Row and column counts after each step.
#[derive(Debug, Default)]
struct StageLog {
    stages: Vec<StageCount>,
}

impl StageLog {
    fn record(&mut self, stage: PipelineStage, df: &DataFrame) {
        let columns = df.width() - usize::from(df.column(RECORD_INDEX).is_ok());
        debug!(stage = %stage, rows = df.height(), columns, "pipeline step finished");
        self.stages.push(StageCount {
            stage,
            rows: df.height(),
            columns,
        });
    }
}

fn run_pipeline(
    records: DataFrame,
    schema: &[SchemaEntry],
    options: &CohortOptions,
    log: &mut StageLog,
) -> Result<Cohort> {
    let sources = &options.source_columns;
    log.record(PipelineStage::Input, &records);
    if records.height() == 0 {
        warn!("input table has no records");
    }
    let covariates = covariate_columns(schema, &column_names(&records), sources);

    let df = attach_record_index(records)?;
    let df = select_schema_columns(df, schema, sources)?;
    log.record(PipelineStage::ColumnSelection, &df);

    let df = filter_quality_flags(df, &sources.death_flag)?;
    log.record(PipelineStage::QualityFlagFilter, &df);

    let df = drop_raw_age_at_death(df, &sources.age_at_death_raw)?;
    log.record(PipelineStage::RawAgeRemoval, &df);

    let df = filter_unknown_age(df, sources)?;
    log.record(PipelineStage::UnknownAgeFilter, &df);

    let df = derive_vital_status(df, &sources.death_flag)?;
    log.record(PipelineStage::VitalStatus, &df);

    let df = derive_age(df, sources, options.max_age_months)?;
    log.record(PipelineStage::AgeDerivation, &df);

    let df = drop_source_columns(df, sources)?;
    log.record(PipelineStage::SourceColumnRemoval, &df);

    let df = derive_censoring(df)?;
    log.record(PipelineStage::Censoring, &df);

    let data = final_projection(df, &covariates)?;
    log.record(PipelineStage::FinalProjection, &data);

    Ok(Cohort { data, covariates })
}

/// Build the analysis cohort from a survey table and its variable schema.
///
/// Deterministic: the same input always yields the same table. Any error
/// aborts the whole build.
pub fn build_cohort(
    records: DataFrame,
    schema: &[SchemaEntry],
    options: &CohortOptions,
) -> Result<Cohort> {
    let span = info_span!("build_cohort", input_rows = records.height());
    let _guard = span.enter();
    let cohort = run_pipeline(records, schema, options, &mut StageLog::default())?;
    info!(
        rows = cohort.height(),
        covariates = cohort.covariates().len(),
        "cohort built"
    );
    Ok(cohort)
}

/// [`build_cohort`] plus the diagnostics gathered along the way.
pub fn build_cohort_with_report(
    records: DataFrame,
    schema: &[SchemaEntry],
    options: &CohortOptions,
) -> Result<(Cohort, BuildReport)> {
    let span = info_span!("build_cohort", input_rows = records.height());
    let _guard = span.enter();
    let sources = &options.source_columns;

    let flags = flag_crosstab(&records, sources)?;
    let mut ages = vec![
        age_summary(&records, &sources.age_at_death_months_imputed)?,
        age_summary(&records, &sources.current_age_months)?,
    ];
    debug!(
        column = %flags.column,
        dropped = flags.dropped(),
        "death flag cross-tabulated"
    );

    let mut log = StageLog::default();
    let cohort = run_pipeline(records, schema, options, &mut log)?;

    ages.push(age_summary(cohort.data(), AGE_CHILD_MONTH)?);
    let endpoints = Endpoint::ALL
        .iter()
        .map(|endpoint| endpoint_summary(&cohort, *endpoint))
        .collect::<Result<Vec<_>>>()?;
    let digest = cohort_digest(&cohort)?;

    info!(
        rows = cohort.height(),
        covariates = cohort.covariates().len(),
        digest = %digest,
        "cohort built"
    );
    let report = BuildReport {
        stages: log.stages,
        flags,
        ages,
        endpoints,
        digest,
    };
    Ok((cohort, report))
}
