//! Load, build and package a cohort for display.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{info, info_span};

use cohort_core::{Cohort, CohortDesign, build_cohort_with_report};
use cohort_ingest::{load_schema, read_csv_table};
use cohort_model::{
    BuildReport, CohortOptions, Endpoint, SchemaEntry, SourceColumns, SurvivalDesign,
};

/// Source column choices collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct ColumnOverrides {
    /// Start from the DHS recode names (`b6`, `b7`, `b13`, `hw1`).
    pub dhs_codes: bool,
    pub death_flag: Option<String>,
    pub age_at_death_months_imputed: Option<String>,
    pub current_age_months: Option<String>,
    pub age_at_death_raw: Option<String>,
}

impl ColumnOverrides {
    pub fn source_columns(&self) -> SourceColumns {
        let mut columns = if self.dhs_codes {
            SourceColumns::dhs_recode()
        } else {
            SourceColumns::default()
        };
        if let Some(name) = &self.death_flag {
            columns = columns.with_death_flag(name.as_str());
        }
        if let Some(name) = &self.age_at_death_months_imputed {
            columns = columns.with_age_at_death_months_imputed(name.as_str());
        }
        if let Some(name) = &self.current_age_months {
            columns = columns.with_current_age_months(name.as_str());
        }
        if let Some(name) = &self.age_at_death_raw {
            columns = columns.with_age_at_death_raw(name.as_str());
        }
        columns
    }

    pub fn options(&self) -> CohortOptions {
        CohortOptions::default().with_source_columns(self.source_columns())
    }
}

/// Everything the `build` command shows.
#[derive(Debug)]
pub struct BuildResult {
    pub data_path: PathBuf,
    pub schema_path: PathBuf,
    pub endpoint: Endpoint,
    pub cohort: Cohort,
    pub report: BuildReport,
    pub design: SurvivalDesign,
}

/// Machine-readable form of a [`BuildResult`].
#[derive(Debug, Serialize)]
pub struct BuildSummary<'a> {
    pub data: &'a Path,
    pub schema: &'a Path,
    pub endpoint: Endpoint,
    pub rows: usize,
    pub covariates: &'a [String],
    pub formula: String,
    pub report: &'a BuildReport,
}

impl BuildResult {
    pub fn summary(&self) -> BuildSummary<'_> {
        BuildSummary {
            data: &self.data_path,
            schema: &self.schema_path,
            endpoint: self.endpoint,
            rows: self.cohort.height(),
            covariates: self.cohort.covariates(),
            formula: self.design.formula(),
            report: &self.report,
        }
    }
}

pub fn load_records(path: &Path) -> Result<DataFrame> {
    let (df, _) = read_csv_table(path)
        .with_context(|| format!("read survey data {}", path.display()))?;
    Ok(df)
}

pub fn load_variables(path: &Path) -> Result<Vec<SchemaEntry>> {
    load_schema(path).with_context(|| format!("read variable schema {}", path.display()))
}

/// Read both input files and build the cohort with its report.
pub fn run_build(
    data_path: &Path,
    schema_path: &Path,
    options: &CohortOptions,
    endpoint: Endpoint,
) -> Result<BuildResult> {
    let span = info_span!("build", data = %data_path.display());
    let _guard = span.enter();

    let records = load_records(data_path)?;
    let schema = load_variables(schema_path)?;
    info!(
        rows = records.height(),
        columns = records.width(),
        variables = schema.len(),
        "inputs loaded"
    );

    let (cohort, report) =
        build_cohort_with_report(records, &schema, options).context("build cohort")?;
    let design = SurvivalDesign::all_covariates(&cohort, endpoint);

    Ok(BuildResult {
        data_path: data_path.to_path_buf(),
        schema_path: schema_path.to_path_buf(),
        endpoint,
        cohort,
        report,
        design,
    })
}
