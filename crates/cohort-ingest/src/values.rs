//! Polars AnyValue utility functions.
//!
//! Helpers for reading individual cells out of a survey table, including
//! strict numeric extraction that tells a missing cell apart from a value
//! that is present but not a number.

use polars::prelude::*;

/// Converts a Polars AnyValue to a String representation.
/// Returns empty string for Null, properly formats numeric types.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Formats a floating-point number as a string without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Strict numeric conversion.
///
/// - `Ok(None)` for null or blank cells
/// - `Ok(Some(v))` for numbers and numeric strings
/// - `Err(text)` for anything else, carrying the offending value
pub fn any_to_number(value: AnyValue<'_>) -> std::result::Result<Option<f64>, String> {
    match value {
        AnyValue::Null => Ok(None),
        AnyValue::Int8(v) => Ok(Some(f64::from(v))),
        AnyValue::Int16(v) => Ok(Some(f64::from(v))),
        AnyValue::Int32(v) => Ok(Some(f64::from(v))),
        AnyValue::Int64(v) => Ok(Some(v as f64)),
        AnyValue::UInt8(v) => Ok(Some(f64::from(v))),
        AnyValue::UInt16(v) => Ok(Some(f64::from(v))),
        AnyValue::UInt32(v) => Ok(Some(f64::from(v))),
        AnyValue::UInt64(v) => Ok(Some(v as f64)),
        AnyValue::Float32(v) => Ok(Some(f64::from(v))),
        AnyValue::Float64(v) => Ok(Some(v)),
        AnyValue::String(s) => parse_number(s),
        AnyValue::StringOwned(s) => parse_number(&s),
        other => Err(other.to_string()),
    }
}

fn parse_number(value: &str) -> std::result::Result<Option<f64>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match parse_f64(trimmed) {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(trimmed.to_string()),
    }
}

/// Parses a string as f64, returning None for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse::<f64>().ok()
}
