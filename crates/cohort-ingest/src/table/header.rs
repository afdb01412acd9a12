//! CSV header parsing and normalization.

use std::collections::BTreeSet;

/// Column names from the header row of a data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvHeaders {
    /// Normalized column names, in file order.
    pub columns: Vec<String>,
}

impl CsvHeaders {
    pub fn new<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            columns: raw
                .into_iter()
                .map(|value| normalize_header(value.as_ref()))
                .collect(),
        }
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// First column name that occurs more than once.
    pub fn first_duplicate(&self) -> Option<&str> {
        let mut seen = BTreeSet::new();
        self.columns
            .iter()
            .find(|column| !seen.insert(column.as_str()))
            .map(String::as_str)
    }

    /// True when some header cell is blank after normalization.
    pub fn has_blank(&self) -> bool {
        self.columns.iter().any(String::is_empty)
    }
}

/// Normalizes a header value: strips a byte-order mark and surrounding whitespace.
pub fn normalize_header(value: &str) -> String {
    value.trim().trim_matches('\u{feff}').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_headers_normalized() {
        let headers = CsvHeaders::new(["\u{feff}caseid", " b7 ", "hw1"]);
        assert_eq!(headers.columns, vec!["caseid", "b7", "hw1"]);
        assert_eq!(headers.len(), 3);
        assert!(headers.contains("b7"));
    }

    #[test]
    fn test_duplicate_detection() {
        let headers = CsvHeaders::new(["b7", "b13", "b7"]);
        assert_eq!(headers.first_duplicate(), Some("b7"));

        let unique = CsvHeaders::new(["b7", "b13"]);
        assert_eq!(unique.first_duplicate(), None);
    }

    #[test]
    fn test_blank_detection() {
        assert!(CsvHeaders::new(["b7", "  "]).has_blank());
        assert!(!CsvHeaders::new(["b7"]).has_blank());
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  hello  "), "hello");
        assert_eq!(normalize_header("hello"), "hello");
    }
}
