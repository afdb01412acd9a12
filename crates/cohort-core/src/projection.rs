//! Schema-driven column resolution.
//!
//! Each schema entry maps to at most one column name (`<name>` or
//! `<name>_recoded`); the analysis reads the intersection of those names
//! with the columns actually present in the survey table.

use std::collections::BTreeSet;

use cohort_model::{SchemaEntry, SourceColumns, VariableKind, is_derived_column};

/// Resolved column names of every selected schema entry, in schema order.
pub fn schema_columns(schema: &[SchemaEntry]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    schema
        .iter()
        .filter_map(SchemaEntry::selected_column)
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Resolved names of the `response` entries.
pub fn response_columns(schema: &[SchemaEntry]) -> Vec<String> {
    schema
        .iter()
        .filter(|entry| entry.kind == VariableKind::Response)
        .map(SchemaEntry::effective_name)
        .collect()
}

/// Columns to keep in step one: resolved schema columns present in the
/// input, followed by any source columns the schema did not list.
pub fn selected_columns(
    schema: &[SchemaEntry],
    available: &[String],
    sources: &SourceColumns,
) -> Vec<String> {
    let present: BTreeSet<&str> = available.iter().map(String::as_str).collect();
    let mut selected: Vec<String> = schema_columns(schema)
        .into_iter()
        .filter(|name| present.contains(name.as_str()))
        .collect();
    for source in sources.all() {
        if present.contains(source) && !selected.iter().any(|name| name == source) {
            selected.push(source.to_string());
        }
    }
    selected
}

/// Covariates carried into the cohort: resolved `feature_*` columns present
/// in the input, excluding source and derived columns, in schema order.
pub fn covariate_columns(
    schema: &[SchemaEntry],
    available: &[String],
    sources: &SourceColumns,
) -> Vec<String> {
    let present: BTreeSet<&str> = available.iter().map(String::as_str).collect();
    let mut seen = BTreeSet::new();
    schema
        .iter()
        .filter(|entry| entry.kind.is_feature())
        .map(SchemaEntry::effective_name)
        .filter(|name| present.contains(name.as_str()))
        .filter(|name| !sources.contains(name) && !is_derived_column(name))
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Vec<SchemaEntry> {
        vec![
            SchemaEntry::feature_categorical("v025").recoded(),
            SchemaEntry::feature_numeric("v012"),
            SchemaEntry::feature_categorical("v190"),
            SchemaEntry::response("b7"),
            SchemaEntry::response("hw1"),
            SchemaEntry::new("caseid", VariableKind::Other("id".into()), false),
        ]
    }

    fn available(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn schema_columns_resolve_recoded_names() {
        assert_eq!(
            schema_columns(&schema()),
            vec!["v025_recoded", "v012", "v190", "b7", "hw1"]
        );
        assert_eq!(response_columns(&schema()), vec!["b7", "hw1"]);
    }

    #[test]
    fn selection_ignores_unknown_names_and_appends_sources() {
        let input = available(&[
            "caseid",
            "v025",
            "v025_recoded",
            "v012",
            "b7",
            "b13",
            "hw1",
            "b6",
        ]);
        let selected = selected_columns(&schema(), &input, &SourceColumns::dhs_recode());
        assert_eq!(
            selected,
            vec!["v025_recoded", "v012", "b7", "hw1", "b6", "b13"]
        );
    }

    #[test]
    fn covariates_exclude_sources_and_missing_columns() {
        let mut entries = schema();
        entries.push(SchemaEntry::feature_numeric("b13"));
        let input = available(&["v025_recoded", "v012", "b7", "b13", "hw1"]);
        let covariates = covariate_columns(&entries, &input, &SourceColumns::dhs_recode());
        assert_eq!(covariates, vec!["v025_recoded", "v012"]);
    }
}
