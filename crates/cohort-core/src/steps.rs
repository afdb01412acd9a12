//! Pipeline steps.
//!
//! Every step takes the table produced by the previous one by value and
//! returns a new table. Steps never look at rows other than the one they are
//! deciding on, so each can be exercised on its own.

use polars::prelude::*;

use cohort_model::{AGE_CHILD_MONTH, DERIVED_COLUMNS, Endpoint, IS_DIED, SchemaEntry, SourceColumns};

use crate::error::{CohortError, Result};
use crate::projection::{response_columns, selected_columns};
use crate::resolve::{FallbackChain, NumericSource};

/// Hidden column carrying each record's position in the raw input, so
/// errors raised after filtering still point at the original row.
pub const RECORD_INDEX: &str = "__record";

/// Names of all columns of `df`, in order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Tag every row with its input position.
///
/// The index column name is reserved; an input column of that name is a
/// schema mismatch.
pub fn attach_record_index(df: DataFrame) -> Result<DataFrame> {
    if has_column(&df, RECORD_INDEX) {
        return Err(CohortError::schema_mismatch(
            RECORD_INDEX,
            "column name is reserved for the record index",
        ));
    }
    Ok(df.with_row_index(RECORD_INDEX.into(), None)?)
}

/// Input position of the row at `idx`, falling back to `idx` itself.
fn record_number(records: Option<&Column>, idx: usize) -> usize {
    records
        .and_then(|column| column.get(idx).ok())
        .and_then(|value| value.extract::<u64>())
        .and_then(|value| usize::try_from(value).ok())
        .unwrap_or(idx)
}

fn record_column(df: &DataFrame) -> Option<&Column> {
    df.column(RECORD_INDEX).ok()
}

fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// Order in which age sources are consulted: current age for living
/// children first, then imputed age at death.
pub fn age_sources(sources: &SourceColumns) -> [&str; 2] {
    [
        sources.current_age_months.as_str(),
        sources.age_at_death_months_imputed.as_str(),
    ]
}

/// Step 1: project onto the schema's resolved columns.
///
/// Unknown schema names are ignored, but every `response` entry and every
/// required source column must be present.
pub fn select_schema_columns(
    df: DataFrame,
    schema: &[SchemaEntry],
    sources: &SourceColumns,
) -> Result<DataFrame> {
    let available = column_names(&df);
    for response in response_columns(schema) {
        if !available.contains(&response) {
            return Err(CohortError::schema_mismatch(
                response,
                "response variable listed in the schema is missing from the data",
            ));
        }
    }
    for required in sources.required() {
        if !available.iter().any(|name| name == required) {
            return Err(CohortError::schema_mismatch(
                required,
                "source column is missing from the data",
            ));
        }
    }

    let mut selected = selected_columns(schema, &available, sources);
    if has_column(&df, RECORD_INDEX) {
        selected.insert(0, RECORD_INDEX.to_string());
    }
    Ok(df.select(selected)?)
}

/// Step 2: drop records whose death flag is present and not zero.
pub fn filter_quality_flags(df: DataFrame, flag_column: &str) -> Result<DataFrame> {
    let flags = NumericSource::new(&df, flag_column);
    let records = record_column(&df);
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let row = record_number(records, idx);
        let retained = match flags.value(idx, row)? {
            None => true,
            Some(flag) if flag.fract() != 0.0 => {
                return Err(CohortError::malformed(
                    Some(row),
                    flag_column,
                    format!("death flag must be a whole number, found {flag}"),
                ));
            }
            Some(flag) => flag == 0.0,
        };
        keep.push(retained);
    }
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    Ok(df.filter(&mask)?)
}

/// Step 3: remove the raw, unit-encoded age-at-death column.
pub fn drop_raw_age_at_death(df: DataFrame, raw_column: &str) -> Result<DataFrame> {
    if has_column(&df, raw_column) {
        Ok(df.drop(raw_column)?)
    } else {
        Ok(df)
    }
}

/// Step 4: drop records where no age source has a value.
pub fn filter_unknown_age(df: DataFrame, sources: &SourceColumns) -> Result<DataFrame> {
    let chain = FallbackChain::over(&df, &age_sources(sources));
    let records = record_column(&df);
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let row = record_number(records, idx);
        keep.push(chain.resolve(idx, row)?.is_some());
    }
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    Ok(df.filter(&mask)?)
}

/// Step 5: `is_died` is true when the death flag is present.
///
/// The flag is only recorded for children with an age at death, so its
/// presence stands in for vital status.
pub fn derive_vital_status(df: DataFrame, flag_column: &str) -> Result<DataFrame> {
    let flags = NumericSource::new(&df, flag_column);
    let records = record_column(&df);
    let mut died = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let row = record_number(records, idx);
        died.push(flags.value(idx, row)?.is_some());
    }
    let mut df = df;
    df.with_column(Series::new(IS_DIED.into(), died))?;
    Ok(df)
}

/// Step 6: `age_child_month` from the first available age source.
///
/// A child has either a current age or an age at death, never both. Ages
/// must be whole months within `0..=max_age_months`.
pub fn derive_age(
    df: DataFrame,
    sources: &SourceColumns,
    max_age_months: i64,
) -> Result<DataFrame> {
    let chain = FallbackChain::over(&df, &age_sources(sources));
    let records = record_column(&df);
    let mut ages = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let row = record_number(records, idx);
        let filled = chain.present(idx, row)?;
        if filled.len() > 1 {
            let columns: Vec<&str> = filled.iter().map(|resolved| resolved.source).collect();
            return Err(CohortError::malformed(
                Some(row),
                columns.join(", "),
                "both a current age and an age at death are filled in",
            ));
        }
        let resolved = chain.require(idx, row)?;
        if resolved.value.fract() != 0.0 {
            return Err(CohortError::malformed(
                Some(row),
                resolved.source,
                format!("age must be whole months, found {}", resolved.value),
            ));
        }
        if resolved.value < 0.0 || resolved.value > max_age_months as f64 {
            return Err(CohortError::malformed(
                Some(row),
                resolved.source,
                format!("age {} is outside 0..={max_age_months} months", resolved.value),
            ));
        }
        ages.push(resolved.value as i64);
    }
    let mut df = df;
    df.with_column(Series::new(AGE_CHILD_MONTH.into(), ages))?;
    Ok(df)
}

/// Step 7: remove the age and flag source columns.
pub fn drop_source_columns(df: DataFrame, sources: &SourceColumns) -> Result<DataFrame> {
    let mut df = df;
    for name in sources.all() {
        if has_column(&df, name) {
            df = df.drop(name)?;
        }
    }
    Ok(df)
}

/// Event indicator for one endpoint: died before the horizon.
pub fn event_indicator(endpoint: Endpoint) -> Expr {
    when(col(IS_DIED).and(col(AGE_CHILD_MONTH).lt(lit(endpoint.horizon_months()))))
        .then(lit(1))
        .otherwise(lit(0))
        .cast(DataType::Int32)
        .alias(endpoint.event_column())
}

/// Step 8: one 0/1 event column per endpoint.
pub fn derive_censoring(df: DataFrame) -> Result<DataFrame> {
    let indicators: Vec<Expr> = Endpoint::ALL.into_iter().map(event_indicator).collect();
    Ok(df.lazy().with_columns(indicators).collect()?)
}

/// Step 9: covariates followed by the derived columns.
pub fn final_projection(df: DataFrame, covariates: &[String]) -> Result<DataFrame> {
    let mut columns: Vec<String> = covariates.to_vec();
    columns.extend(DERIVED_COLUMNS.iter().map(|name| name.to_string()));
    Ok(df.select(columns)?)
}
