//! Survey table reading utilities.

mod header;
mod reader;

pub use header::{CsvHeaders, normalize_header};
pub use reader::{
    MAX_CSV_FILE_SIZE, MISSING_TOKENS, check_file_size, check_file_size_with_limit,
    read_csv_schema, read_csv_table, validate_dataframe_shape, validate_encoding,
};
