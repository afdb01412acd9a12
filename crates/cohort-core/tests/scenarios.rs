//! End-to-end cohort builds over hand-written birth tables.

use cohort_core::{
    CohortError, build_cohort, build_cohort_with_report, cohort_digest, endpoint_summary,
};
use cohort_model::{CohortOptions, Endpoint, PipelineStage, SchemaEntry};
use polars::prelude::*;

/// One living child, two deaths either side of the first birthday, one
/// quality-flagged death and one child without any age.
fn birth_records() -> DataFrame {
    df!(
        "child" => ["alive", "died_infant", "died_toddler", "flagged", "no_age"],
        "age_at_death_raw" => [None, Some(105i64), Some(340), Some(210), None],
        "age_at_death_months_imputed" => [None, Some(5i64), Some(40), Some(10), None],
        "death_flag" => [None, Some(0i64), Some(0), Some(6), None],
        "current_age_months" => [Some(30i64), None, None, None, None],
    )
    .unwrap()
}

fn birth_schema() -> Vec<SchemaEntry> {
    vec![
        SchemaEntry::feature_categorical("child"),
        SchemaEntry::response("age_at_death_months_imputed"),
    ]
}

fn strings(df: &DataFrame, name: &str) -> Vec<String> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|value| value.unwrap_or_default().to_string())
        .collect()
}

fn ints(df: &DataFrame, name: &str) -> Vec<i64> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Int64)
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .map(|value| value.unwrap())
        .collect()
}

fn bools(df: &DataFrame, name: &str) -> Vec<bool> {
    df.column(name)
        .unwrap()
        .bool()
        .unwrap()
        .into_iter()
        .map(|value| value.unwrap())
        .collect()
}

#[test]
fn retained_children_get_age_status_and_events() {
    let cohort = build_cohort(birth_records(), &birth_schema(), &CohortOptions::default())
        .expect("build cohort");
    let df = cohort.data();

    assert_eq!(strings(df, "child"), vec!["alive", "died_infant", "died_toddler"]);
    assert_eq!(ints(df, "age_child_month"), vec![30, 5, 40]);
    assert_eq!(bools(df, "is_died"), vec![false, true, true]);
    assert_eq!(ints(df, "censored_u5"), vec![0, 1, 1]);
    assert_eq!(ints(df, "censored_u1"), vec![0, 1, 0]);
}

#[test]
fn censor_columns_are_int32() {
    let cohort =
        build_cohort(birth_records(), &birth_schema(), &CohortOptions::default()).unwrap();
    let df = cohort.data();
    assert_eq!(df.column("censored_u5").unwrap().dtype(), &DataType::Int32);
    assert_eq!(df.column("censored_u1").unwrap().dtype(), &DataType::Int32);
    assert_eq!(df.column("age_child_month").unwrap().dtype(), &DataType::Int64);
}

#[test]
fn builds_are_idempotent() {
    let options = CohortOptions::default();
    let first = build_cohort(birth_records(), &birth_schema(), &options).unwrap();
    let second = build_cohort(birth_records(), &birth_schema(), &options).unwrap();

    assert!(first.data().equals_missing(second.data()));
    assert_eq!(cohort_digest(&first).unwrap(), cohort_digest(&second).unwrap());
}

#[test]
fn report_counts_each_stage() {
    let (cohort, report) = build_cohort_with_report(
        birth_records(),
        &birth_schema(),
        &CohortOptions::default(),
    )
    .unwrap();

    assert_eq!(report.rows_at(PipelineStage::Input), Some(5));
    assert_eq!(report.rows_at(PipelineStage::QualityFlagFilter), Some(4));
    assert_eq!(report.rows_at(PipelineStage::UnknownAgeFilter), Some(3));
    assert_eq!(report.rows_at(PipelineStage::FinalProjection), Some(3));
    assert_eq!(report.flags.total(), 5);
    assert_eq!(report.flags.dropped(), 1);

    let u1 = endpoint_summary(&cohort, Endpoint::U1).unwrap();
    assert_eq!((u1.subjects, u1.events, u1.censored), (3, 1, 2));
    assert_eq!(report.endpoints.len(), 2);
}

#[test]
fn missing_response_column_is_schema_mismatch() {
    let mut schema = birth_schema();
    schema.push(SchemaEntry::response("b5"));
    let err = build_cohort(birth_records(), &schema, &CohortOptions::default()).unwrap_err();
    assert!(matches!(err, CohortError::SchemaMismatch { ref column, .. } if column == "b5"));
}

#[test]
fn recoded_response_resolves_to_suffixed_column() {
    let mut df = birth_records();
    df.with_column(Series::new("v025_recoded".into(), [1i64, 2, 1, 2, 1]))
        .unwrap();
    let schema = vec![
        SchemaEntry::feature_categorical("v025").recoded(),
        SchemaEntry::response("age_at_death_months_imputed"),
    ];
    let cohort = build_cohort(df, &schema, &CohortOptions::default()).unwrap();
    assert_eq!(cohort.covariates(), ["v025_recoded"]);
}

#[test]
fn unknown_schema_names_are_ignored() {
    let mut schema = birth_schema();
    schema.push(SchemaEntry::feature_numeric("v999"));
    let cohort = build_cohort(birth_records(), &schema, &CohortOptions::default()).unwrap();
    assert_eq!(cohort.covariates(), ["child"]);
}

#[test]
fn non_numeric_age_is_malformed_input() {
    let df = df!(
        "death_flag" => [Option::<i64>::None, None],
        "age_at_death_months_imputed" => [Option::<i64>::None, None],
        "current_age_months" => [Some("12"), Some("twelve")],
    )
    .unwrap();
    let err = build_cohort(df, &[], &CohortOptions::default()).unwrap_err();
    match err {
        CohortError::MalformedInput { row, column, .. } => {
            assert_eq!(row, Some(1));
            assert_eq!(column, "current_age_months");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn header_only_input_yields_empty_cohort() {
    let df = birth_records().head(Some(0));
    let cohort = build_cohort(df, &birth_schema(), &CohortOptions::default()).unwrap();
    assert!(cohort.is_empty());
    assert_eq!(cohort.data().width(), 5);
}

#[test]
fn child_with_both_ages_is_malformed_input() {
    let df = df!(
        "death_flag" => [Some(0i64), None],
        "age_at_death_months_imputed" => [Some(5i64), Some(3)],
        "current_age_months" => [Some(30i64), Some(20)],
    )
    .unwrap();
    let err = build_cohort(df, &[], &CohortOptions::default()).unwrap_err();
    match err {
        CohortError::MalformedInput { row, column, .. } => {
            assert_eq!(row, Some(0));
            assert!(column.contains("current_age_months"), "{column}");
            assert!(column.contains("age_at_death_months_imputed"), "{column}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn reserved_record_index_column_is_schema_mismatch() {
    let mut df = birth_records();
    df.with_column(Series::new("__record".into(), [0i64, 1, 2, 3, 4]))
        .unwrap();
    let err = build_cohort(df, &birth_schema(), &CohortOptions::default()).unwrap_err();
    assert!(matches!(err, CohortError::SchemaMismatch { ref column, .. } if column == "__record"));
}
