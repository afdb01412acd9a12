//! Ordered fallback resolution across partially-overlapping source columns.
//!
//! A child's age comes from whichever of several survey columns is filled
//! in: current age for living children, imputed age at death otherwise.
//! [`FallbackChain`] tries its sources in order and reports the first
//! non-null value together with the column it came from.

use polars::prelude::{AnyValue, Column, DataFrame};

use cohort_ingest::any_to_number;

use crate::error::{CohortError, Result};

/// One nullable numeric accessor over a table column.
///
/// A column that is absent from the table reads as null on every row.
#[derive(Debug, Clone, Copy)]
pub struct NumericSource<'a> {
    name: &'a str,
    column: Option<&'a Column>,
}

impl<'a> NumericSource<'a> {
    pub fn new(df: &'a DataFrame, name: &'a str) -> Self {
        Self {
            name,
            column: df.column(name).ok(),
        }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Value at `idx`; `row` is the record number reported on failure.
    pub fn value(&self, idx: usize, row: usize) -> Result<Option<f64>> {
        let Some(column) = self.column else {
            return Ok(None);
        };
        any_to_number(column.get(idx).unwrap_or(AnyValue::Null)).map_err(|value| {
            CohortError::malformed(
                Some(row),
                self.name,
                format!("expected a number, found '{value}'"),
            )
        })
    }
}

/// A value picked by a [`FallbackChain`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved<'a> {
    pub value: f64,
    pub source: &'a str,
}

/// Sources tried in order; the first non-null value wins.
#[derive(Debug, Clone, Default)]
pub struct FallbackChain<'a> {
    sources: Vec<NumericSource<'a>>,
}

impl<'a> FallbackChain<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain over the named columns of `df`, in the given order.
    pub fn over(df: &'a DataFrame, names: &[&'a str]) -> Self {
        names
            .iter()
            .fold(Self::new(), |chain, name| chain.then(NumericSource::new(df, *name)))
    }

    /// Append a lower-priority source.
    #[must_use]
    pub fn then(mut self, source: NumericSource<'a>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn sources(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.sources.iter().map(NumericSource::name)
    }

    /// First non-null value at `idx`, or `None` when every source is null.
    ///
    /// A malformed value in any source consulted fails the lookup.
    pub fn resolve(&self, idx: usize, row: usize) -> Result<Option<Resolved<'a>>> {
        for source in &self.sources {
            if let Some(value) = source.value(idx, row)? {
                return Ok(Some(Resolved {
                    value,
                    source: source.name(),
                }));
            }
        }
        Ok(None)
    }

    /// Every non-null value at `idx`, in chain order.
    pub fn present(&self, idx: usize, row: usize) -> Result<Vec<Resolved<'a>>> {
        let mut filled = Vec::new();
        for source in &self.sources {
            if let Some(value) = source.value(idx, row)? {
                filled.push(Resolved {
                    value,
                    source: source.name(),
                });
            }
        }
        Ok(filled)
    }

    /// Like [`FallbackChain::resolve`] but a row with no value is an error.
    pub fn require(&self, idx: usize, row: usize) -> Result<Resolved<'a>> {
        self.resolve(idx, row)?
            .ok_or(CohortError::IncompleteRecord { row })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    const AGES: [&str; 2] = ["current_age_months", "age_at_death_months_imputed"];

    fn ages() -> DataFrame {
        df!(
            "current_age_months" => [Some(30i64), None, None],
            "age_at_death_months_imputed" => [None, Some(5i64), None],
        )
        .unwrap()
    }

    #[test]
    fn first_non_null_source_wins() {
        let df = ages();
        let chain = FallbackChain::over(&df, &AGES);

        let first = chain.resolve(0, 0).unwrap().unwrap();
        assert_eq!(first.value, 30.0);
        assert_eq!(first.source, "current_age_months");

        let second = chain.resolve(1, 1).unwrap().unwrap();
        assert_eq!(second.value, 5.0);
        assert_eq!(second.source, "age_at_death_months_imputed");

        assert!(chain.resolve(2, 2).unwrap().is_none());
    }

    #[test]
    fn present_lists_every_filled_source() {
        let df = df!(
            "current_age_months" => [Some(30i64), None],
            "age_at_death_months_imputed" => [Some(5i64), None],
        )
        .unwrap();
        let chain = FallbackChain::over(&df, &AGES);
        let sources: Vec<&str> = chain
            .present(0, 0)
            .unwrap()
            .iter()
            .map(|resolved| resolved.source)
            .collect();
        assert_eq!(sources, vec!["current_age_months", "age_at_death_months_imputed"]);
        assert!(chain.present(1, 1).unwrap().is_empty());
    }

    #[test]
    fn require_reports_incomplete_record() {
        let df = ages();
        let chain = FallbackChain::over(&df, &AGES);
        let err = chain.require(2, 17).unwrap_err();
        assert!(matches!(err, CohortError::IncompleteRecord { row: 17 }));
    }

    #[test]
    fn missing_columns_read_as_null() {
        let df = ages();
        let chain = FallbackChain::over(&df, &["not_there", "current_age_months"]);
        assert_eq!(chain.resolve(0, 0).unwrap().unwrap().source, "current_age_months");
        assert_eq!(
            chain.sources().collect::<Vec<_>>(),
            vec!["not_there", "current_age_months"]
        );
    }

    #[test]
    fn malformed_value_names_column_and_row() {
        let df = df!("current_age_months" => ["thirty"]).unwrap();
        let chain = FallbackChain::over(&df, &["current_age_months"]);
        let err = chain.resolve(0, 3).unwrap_err();
        assert!(matches!(
            err,
            CohortError::MalformedInput { row: Some(3), ref column, .. }
                if column == "current_age_months"
        ));
    }
}
