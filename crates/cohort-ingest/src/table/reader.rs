//! Survey data file reading.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use polars::prelude::*;

use crate::error::{IngestError, Result};

use super::header::CsvHeaders;

/// Maximum file size for CSV loading (500 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Cell values treated as missing in addition to empty cells.
///
/// Stata and SPSS exports of DHS recodes write system-missing as `.`;
/// R and pandas exports write `NA`.
pub const MISSING_TOKENS: &[&str] = &["", ".", "NA"];

/// Check file size before loading.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_CSV_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::from_io(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Detect encoding and validate it's supported (UTF-8 only).
///
/// Checks for UTF-16 BOM markers which are not supported.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| IngestError::from_io(path, e))?;

    let mut buffer = [0u8; 4];
    let bytes_read = file
        .read(&mut buffer)
        .map_err(|e| IngestError::from_io(path, e))?;

    if bytes_read >= 2 {
        if buffer[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    Ok(())
}

/// Reads and checks the header row.
///
/// Fails on an empty file, a blank column name, or a repeated column name.
pub fn read_csv_schema(path: &Path) -> Result<CsvHeaders> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| IngestError::from_csv(path, e))?;
    let record = reader
        .headers()
        .map_err(|e| IngestError::from_csv(path, e))?;
    let headers = CsvHeaders::new(record.iter());

    if headers.is_empty() || headers.columns.iter().all(String::is_empty) {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    if headers.has_blank() {
        return Err(IngestError::EmptyColumnName {
            path: path.to_path_buf(),
        });
    }
    if let Some(column) = headers.first_duplicate() {
        return Err(IngestError::DuplicateColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        });
    }

    Ok(headers)
}

/// Validate DataFrame shape after loading.
///
/// A header-only file is accepted (it yields an empty cohort) but logged.
pub fn validate_dataframe_shape(df: &DataFrame, path: &Path) -> Result<()> {
    if df.height() == 0 {
        tracing::warn!(path = %path.display(), "data file has no records");
    }

    if df.width() > 500 {
        tracing::warn!(
            path = %path.display(),
            columns = df.width(),
            "Dataset has more than 500 columns - may impact performance"
        );
    }

    Ok(())
}

/// Reads a survey CSV file into a Polars DataFrame.
///
/// Column types are inferred from the whole file so sparse numeric columns
/// (age at death is missing for most children) are not mistaken for strings.
/// Column names are normalized the same way [`read_csv_schema`] reports them.
pub fn read_csv_table(path: &Path) -> Result<(DataFrame, CsvHeaders)> {
    check_file_size(path)?;
    validate_encoding(path)?;
    let headers = read_csv_schema(path)?;

    let null_values = NullValues::AllColumns(
        MISSING_TOKENS
            .iter()
            .map(|token| PlSmallStr::from(*token))
            .collect(),
    );

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(move |opts| opts.with_null_values(Some(null_values.clone())))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.width() == headers.len() {
        df.set_column_names(headers.columns.iter().map(String::as_str))?;
    }
    validate_dataframe_shape(&df, path)?;

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded survey table"
    );

    Ok((df, headers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_csv_schema_single_header() {
        let file = create_temp_csv("caseid,b7,hw1\n1,,30\n2,5,\n");
        let headers = read_csv_schema(file.path()).unwrap();

        assert_eq!(headers.columns, vec!["caseid", "b7", "hw1"]);
    }

    #[test]
    fn test_read_csv_schema_empty_file() {
        let file = create_temp_csv("");
        let result = read_csv_schema(file.path());

        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_read_csv_schema_duplicate_column() {
        let file = create_temp_csv("b7,b13,b7\n1,2,3\n");
        let result = read_csv_schema(file.path());

        assert!(matches!(
            result,
            Err(IngestError::DuplicateColumn { ref column, .. }) if column == "b7"
        ));
    }

    #[test]
    fn test_read_csv_schema_with_bom() {
        let file = create_temp_csv("\u{feff}b7,b13\n1,2\n");
        let headers = read_csv_schema(file.path()).unwrap();

        assert_eq!(headers.columns, vec!["b7", "b13"]);
    }

    #[test]
    fn test_read_csv_table_missing_values() {
        let file = create_temp_csv("b7,b13,hw1\n,,30\n5,0,\n.,NA,12\n");
        let (df, headers) = read_csv_table(file.path()).unwrap();

        assert_eq!(headers.len(), 3);
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 3);
        assert_eq!(df.column("b7").unwrap().null_count(), 2);
        assert_eq!(df.column("b13").unwrap().null_count(), 2);
        assert_eq!(df.column("hw1").unwrap().null_count(), 1);
    }

    #[test]
    fn test_read_csv_table_missing_file() {
        let result = read_csv_table(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_file_size_limit() {
        let file = create_temp_csv("b7\n1\n");
        let result = check_file_size_with_limit(file.path(), 2);
        assert!(matches!(result, Err(IngestError::FileTooLarge { .. })));
    }
}
