//! Observational summaries of the input and the finished cohort.
//!
//! Nothing here feeds back into the pipeline.

use std::collections::BTreeMap;

use polars::prelude::*;

use cohort_ingest::any_to_number;
use cohort_model::{AgeSummary, Endpoint, EndpointSummary, FlagCount, FlagCrosstab, SourceColumns};

use crate::cohort::Cohort;
use crate::error::{CohortError, Result};

fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
    let series = df.column(column).map_err(|_| {
        CohortError::schema_mismatch(column, "column is missing from the data")
    })?;
    (0..series.len())
        .map(|idx| {
            let value = series.get(idx).unwrap_or(AnyValue::Null);
            any_to_number(value).map_err(|value| {
                CohortError::malformed(
                    Some(idx),
                    column,
                    format!("expected a number, found '{value}'"),
                )
            })
        })
        .collect()
}

/// Frequency of every death flag value, missing included.
pub fn flag_crosstab(df: &DataFrame, columns: &SourceColumns) -> Result<FlagCrosstab> {
    let column = columns.death_flag.as_str();
    let mut counts: BTreeMap<Option<i64>, usize> = BTreeMap::new();
    for (idx, value) in numeric_values(df, column)?.into_iter().enumerate() {
        let key = match value {
            None => None,
            Some(flag) if flag.fract() == 0.0 => Some(flag as i64),
            Some(flag) => {
                return Err(CohortError::malformed(
                    Some(idx),
                    column,
                    format!("death flag must be a whole number, found {flag}"),
                ));
            }
        };
        *counts.entry(key).or_default() += 1;
    }
    Ok(FlagCrosstab {
        column: column.to_string(),
        counts: counts
            .into_iter()
            .map(|(value, count)| FlagCount { value, count })
            .collect(),
    })
}

/// Count, missing, range, mean and median of one age column.
pub fn age_summary(df: &DataFrame, column: &str) -> Result<AgeSummary> {
    let values = numeric_values(df, column)?;
    let missing = values.iter().filter(|value| value.is_none()).count();
    let mut present: Vec<f64> = values.into_iter().flatten().collect();
    present.sort_by(f64::total_cmp);

    let count = present.len();
    let mean = (count > 0).then(|| present.iter().sum::<f64>() / count as f64);
    let median = match count {
        0 => None,
        n if n % 2 == 1 => Some(present[n / 2]),
        n => Some((present[n / 2 - 1] + present[n / 2]) / 2.0),
    };

    Ok(AgeSummary {
        column: column.to_string(),
        count,
        missing,
        min: present.first().copied(),
        max: present.last().copied(),
        mean,
        median,
    })
}

/// Events and right-censored subjects for one endpoint.
pub fn endpoint_summary(cohort: &Cohort, endpoint: Endpoint) -> Result<EndpointSummary> {
    let indicators = cohort.data().column(endpoint.event_column())?.i32()?;
    let events = indicators
        .into_iter()
        .flatten()
        .filter(|indicator| *indicator == 1)
        .count();
    let subjects = cohort.height();
    Ok(EndpointSummary {
        endpoint,
        subjects,
        events,
        censored: subjects - events,
    })
}
