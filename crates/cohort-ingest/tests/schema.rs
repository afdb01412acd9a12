//! Integration tests for schema file loading.

use std::io::Write;

use cohort_ingest::{IngestError, load_schema};
use cohort_model::{SchemaEntry, VariableKind};
use tempfile::NamedTempFile;

fn schema_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write schema");
    file
}

#[test]
fn loads_entries_in_file_order() {
    let file = schema_file(
        "Name,Type,Recoded\n\
         v025,feature_categorical,True\n\
         v106,feature_categorical,False\n\
         v012,feature_numeric,False\n\
         b7,response,False\n\
         caseid,id,False\n",
    );
    let schema = load_schema(file.path()).expect("load schema");

    assert_eq!(
        schema,
        vec![
            SchemaEntry::feature_categorical("v025").recoded(),
            SchemaEntry::feature_categorical("v106"),
            SchemaEntry::feature_numeric("v012"),
            SchemaEntry::response("b7"),
            SchemaEntry::new("caseid", VariableKind::Other("id".to_string()), false),
        ]
    );
}

#[test]
fn headers_are_case_insensitive_and_extra_columns_ignored() {
    let file = schema_file("NAME,type,Label,RECODED\nhw1, Response ,Age in months,no\n");
    let schema = load_schema(file.path()).expect("load schema");

    assert_eq!(schema, vec![SchemaEntry::response("hw1")]);
}

#[test]
fn missing_recoded_column_defaults_to_raw() {
    let file = schema_file("Name,Type\nv025,feature_categorical\n");
    let schema = load_schema(file.path()).expect("load schema");

    assert_eq!(schema.len(), 1);
    assert!(!schema[0].recoded);
}

#[test]
fn blank_names_are_skipped_and_duplicates_keep_first() {
    let file = schema_file(
        "Name,Type,Recoded\n\
         ,feature_numeric,False\n\
         v025,feature_categorical,True\n\
         v025,feature_numeric,False\n",
    );
    let schema = load_schema(file.path()).expect("load schema");

    assert_eq!(schema, vec![SchemaEntry::feature_categorical("v025").recoded()]);
}

#[test]
fn missing_type_column_is_rejected() {
    let file = schema_file("Name,Recoded\nv025,True\n");
    let result = load_schema(file.path());

    assert!(matches!(
        result,
        Err(IngestError::MissingColumn { ref column, .. }) if column == "type"
    ));
}

#[test]
fn invalid_recoded_value_reports_line() {
    let file = schema_file("Name,Type,Recoded\nv025,feature_categorical,perhaps\n");
    let result = load_schema(file.path());

    match result {
        Err(IngestError::InvalidValue { field, value, line, .. }) => {
            assert_eq!(field, "Recoded");
            assert_eq!(value, "perhaps");
            assert_eq!(line, 2);
        }
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}
