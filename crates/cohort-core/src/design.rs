//! Survival designs over a built cohort.
//!
//! The estimator itself lives outside this workspace; these helpers pick the
//! time, event and covariate columns it is handed.

use std::collections::BTreeSet;

use polars::prelude::*;

use cohort_ingest::any_to_string;
use cohort_model::{AGE_CHILD_MONTH, Endpoint, SurvivalDesign};

use crate::cohort::Cohort;
use crate::error::{CohortError, Result};

/// Constructors and projections tying a [`SurvivalDesign`] to a [`Cohort`].
pub trait CohortDesign: Sized {
    /// `time ~ .` over every covariate. Outcome columns are never covariates.
    fn all_covariates(cohort: &Cohort, endpoint: Endpoint) -> Self;

    /// Single-covariate model; the covariate must belong to the cohort.
    fn single(cohort: &Cohort, endpoint: Endpoint, covariate: &str) -> Result<Self>;

    /// The cohort restricted to exactly the design's columns.
    fn frame(&self, cohort: &Cohort) -> Result<DataFrame>;
}

impl CohortDesign for SurvivalDesign {
    fn all_covariates(cohort: &Cohort, endpoint: Endpoint) -> Self {
        SurvivalDesign::new(AGE_CHILD_MONTH, endpoint.event_column())
            .with_covariates(cohort.covariates().iter().cloned())
    }

    fn single(cohort: &Cohort, endpoint: Endpoint, covariate: &str) -> Result<Self> {
        if !cohort.has_covariate(covariate) {
            return Err(CohortError::schema_mismatch(
                covariate,
                "not a covariate of the cohort",
            ));
        }
        Ok(SurvivalDesign::new(AGE_CHILD_MONTH, endpoint.event_column())
            .with_covariates([covariate]))
    }

    fn frame(&self, cohort: &Cohort) -> Result<DataFrame> {
        Ok(cohort.data().select(self.columns())?)
    }
}

/// Distinct values of a covariate, sorted; one survival curve per stratum.
///
/// Missing values form their own stratum, rendered as an empty string.
pub fn strata(cohort: &Cohort, covariate: &str) -> Result<Vec<String>> {
    if !cohort.has_covariate(covariate) {
        return Err(CohortError::schema_mismatch(
            covariate,
            "not a covariate of the cohort",
        ));
    }
    let column = cohort.data().column(covariate)?;
    let mut values = BTreeSet::new();
    for idx in 0..column.len() {
        values.insert(any_to_string(column.get(idx)?));
    }
    Ok(values.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_model::{CohortOptions, SchemaEntry};

    use crate::cohort::build_cohort;

    fn cohort() -> Cohort {
        let df = df!(
            "v025" => ["urban", "rural", "urban"],
            "v012" => [25i64, 31, 19],
            "b6" => [None, Some(105i64), None],
            "b7" => [None, Some(5i64), None],
            "b13" => [None, Some(0i64), None],
            "hw1" => [Some(30i64), None, Some(2)],
        )
        .unwrap();
        let schema = vec![
            SchemaEntry::feature_categorical("v025"),
            SchemaEntry::feature_numeric("v012"),
            SchemaEntry::response("b7"),
        ];
        build_cohort(df, &schema, &CohortOptions::dhs_recode()).unwrap()
    }

    #[test]
    fn all_covariates_excludes_outcomes() {
        let design = SurvivalDesign::all_covariates(&cohort(), Endpoint::U5);
        assert_eq!(design.event, "censored_u5");
        insta::assert_snapshot!(design.formula(), @"age_child_month ~ v025 + v012");
    }

    #[test]
    fn single_covariate_design() {
        let cohort = cohort();
        let design = SurvivalDesign::single(&cohort, Endpoint::U1, "v025").unwrap();
        insta::assert_snapshot!(design.formula(), @"age_child_month ~ v025");

        let frame = design.frame(&cohort).unwrap();
        assert_eq!(frame.width(), 3);
        assert_eq!(frame.height(), 3);
    }

    #[test]
    fn unknown_covariate_is_schema_mismatch() {
        let err = SurvivalDesign::single(&cohort(), Endpoint::U5, "is_died").unwrap_err();
        assert!(matches!(err, CohortError::SchemaMismatch { .. }));
    }

    #[test]
    fn strata_are_sorted_and_distinct() {
        assert_eq!(strata(&cohort(), "v025").unwrap(), vec!["rural", "urban"]);
    }
}
