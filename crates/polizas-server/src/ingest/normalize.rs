//! Row-to-record normalization

use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

use super::profile::TableProfile;

/// A single normalized field value.
///
/// Serializes untagged so a record becomes a flat JSON object suitable
/// for the jsonb batch-insert payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Number(f64),
    Text(String),
}

/// One key per header, duplicate headers overwrite (later column wins).
pub type NormalizedRecord = HashMap<String, FieldValue>;

/// Map a reconciled row into a record using the table's profile.
///
/// Empty strings always become null (the row "had no value" there); the
/// profile's null literals and numeric coercion apply on top.
pub fn normalize_row(
    headers: &[String],
    row: &[Option<String>],
    profile: &TableProfile,
) -> NormalizedRecord {
    let mut record = NormalizedRecord::with_capacity(headers.len());

    for (index, header) in headers.iter().enumerate() {
        let raw = row.get(index).and_then(|value| value.as_deref());
        let value = normalize_field(header, raw, profile);

        if record.insert(header.clone(), value).is_some() {
            warn!(header = %header, "Duplicate CSV header; keeping the later column's value");
        }
    }

    record
}

fn normalize_field(header: &str, raw: Option<&str>, profile: &TableProfile) -> FieldValue {
    let Some(raw) = raw else {
        return FieldValue::Null;
    };

    if raw.is_empty() || profile.null_literals.contains(&raw) {
        return FieldValue::Null;
    }

    if profile.is_numeric_column(header) {
        if let Some(number) = parse_numeric_prefix(raw) {
            return FieldValue::Number(number);
        }
    }

    FieldValue::Text(raw.to_string())
}

/// Parse the longest numeric prefix of `raw`, ignoring leading whitespace.
///
/// The legacy importer coerced with JavaScript's `parseFloat`, which reads
/// an optional sign, digits, decimal point, and exponent, then stops at the
/// first character that no longer fits ("1500.50 USD" is 1500.5). Values
/// with no numeric prefix at all stay text.
fn parse_numeric_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let mut saw_digit = false;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        saw_digit = true;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            saw_digit = true;
        }
    }
    if !saw_digit {
        return None;
    }

    let mut end = i;
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
            j += 1;
        }
        let exponent_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exponent_start {
            end = j;
        }
    }

    s[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::profile::{RENOVACIONES_PROFILE, VALIDACIONES_PROFILE};

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn row(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|s| Some(s.to_string())).collect()
    }

    #[test]
    fn test_record_has_one_key_per_header() {
        let headers = headers(&["SOLICITUD", "NOMBRE", "CREDITO", "VIGENCIA AUTO"]);
        let record = normalize_row(
            &headers,
            &row(&["1", "Juan", "100", "2026-01-01"]),
            &RENOVACIONES_PROFILE,
        );
        assert_eq!(record.len(), headers.len());
        for header in &headers {
            assert!(record.contains_key(header));
        }
    }

    #[test]
    fn test_numeric_coercion_on_marked_header() {
        let record = normalize_row(
            &headers(&["COSTO AUTO"]),
            &row(&["1500.50"]),
            &RENOVACIONES_PROFILE,
        );
        assert_eq!(record["COSTO AUTO"], FieldValue::Number(1500.5));
    }

    #[test]
    fn test_failed_numeric_parse_keeps_original_string() {
        let record = normalize_row(
            &headers(&["COSTO AUTO"]),
            &row(&["N/A"]),
            &RENOVACIONES_PROFILE,
        );
        assert_eq!(record["COSTO AUTO"], FieldValue::Text("N/A".to_string()));
    }

    #[test]
    fn test_numeric_prefix_is_coerced() {
        let record = normalize_row(
            &headers(&["COSTO AUTO"]),
            &row(&["1500.50 USD"]),
            &RENOVACIONES_PROFILE,
        );
        assert_eq!(record["COSTO AUTO"], FieldValue::Number(1500.5));
    }

    #[test]
    fn test_parse_numeric_prefix() {
        assert_eq!(parse_numeric_prefix("1500.50 USD"), Some(1500.5));
        assert_eq!(parse_numeric_prefix("  -3.5abc"), Some(-3.5));
        assert_eq!(parse_numeric_prefix("+12"), Some(12.0));
        assert_eq!(parse_numeric_prefix(".5"), Some(0.5));
        assert_eq!(parse_numeric_prefix("1e3x"), Some(1000.0));
        assert_eq!(parse_numeric_prefix("1e"), Some(1.0));
        assert_eq!(parse_numeric_prefix("N/A"), None);
        assert_eq!(parse_numeric_prefix("-"), None);
        assert_eq!(parse_numeric_prefix(""), None);
    }

    #[test]
    fn test_unmarked_header_stays_text() {
        let record = normalize_row(&headers(&["NOMBRE"]), &row(&["1234"]), &RENOVACIONES_PROFILE);
        assert_eq!(record["NOMBRE"], FieldValue::Text("1234".to_string()));
    }

    #[test]
    fn test_null_literals_become_null() {
        let record = normalize_row(
            &headers(&["VIGENCIA AUTO", "VIGENCIA VIDA", "SERIE"]),
            &row(&["NaT", "NaN", ""]),
            &RENOVACIONES_PROFILE,
        );
        assert_eq!(record["VIGENCIA AUTO"], FieldValue::Null);
        assert_eq!(record["VIGENCIA VIDA"], FieldValue::Null);
        assert_eq!(record["SERIE"], FieldValue::Null);
    }

    #[test]
    fn test_padded_cell_is_null() {
        let record = normalize_row(
            &headers(&["A", "B"]),
            &[Some("1".to_string()), None],
            &VALIDACIONES_PROFILE,
        );
        assert_eq!(record["B"], FieldValue::Null);
    }

    #[test]
    fn test_validaciones_passes_values_through() {
        let record = normalize_row(
            &headers(&["SOLICITUD", "ESTATUS"]),
            &row(&["1500.50", "NaT"]),
            &VALIDACIONES_PROFILE,
        );
        assert_eq!(record["SOLICITUD"], FieldValue::Text("1500.50".to_string()));
        assert_eq!(record["ESTATUS"], FieldValue::Text("NaT".to_string()));
    }

    #[test]
    fn test_duplicate_header_later_column_wins() {
        let record = normalize_row(
            &headers(&["NOMBRE", "NOMBRE"]),
            &row(&["primero", "segundo"]),
            &VALIDACIONES_PROFILE,
        );
        assert_eq!(record.len(), 1);
        assert_eq!(record["NOMBRE"], FieldValue::Text("segundo".to_string()));
    }

    #[test]
    fn test_field_value_serialization() {
        assert_eq!(serde_json::to_value(FieldValue::Null).unwrap(), serde_json::Value::Null);
        assert_eq!(serde_json::to_value(FieldValue::Number(1500.5)).unwrap(), 1500.5);
        assert_eq!(serde_json::to_value(FieldValue::Text("x".into())).unwrap(), "x");
    }
}
