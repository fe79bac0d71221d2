//! Minimal CSV reader for wizard uploads.
//!
//! Lines are split on `\n`, cells on `,`. Quoted fields are not supported:
//! a comma inside quotes misaligns the row. Uploads are small customer or
//! product exports, so the simple reader is kept on purpose.

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

/// Declared content type accepted for uploads.
pub const CSV_MIME: &str = "text/csv";

#[derive(Debug, Error, PartialEq)]
pub enum CsvError {
    #[error("Please upload a CSV file (got '{0}')")]
    InvalidFileType(String),
}

/// One data row, keyed by header name in header order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRow {
    fields: Vec<(String, String)>,
}

impl ParsedRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, value)| value.is_empty())
    }

    /// A repeated column keeps its first position and takes the latest value.
    fn insert(&mut self, column: &str, value: String) {
        match self.fields.iter_mut().find(|(name, _)| name == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column.to_string(), value)),
        }
    }
}

impl FromIterator<(String, String)> for ParsedRow {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut row = ParsedRow::default();
        for (column, value) in iter {
            row.insert(&column, value);
        }
        row
    }
}

/// Serializes as a JSON object that preserves column order.
impl Serialize for ParsedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Checks the declared content type. Parameters such as `charset` are ignored.
pub fn is_csv_mime(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case(CSV_MIME))
        .unwrap_or(false)
}

/// Validates the declared type, then parses the bytes.
pub fn parse_csv_upload(
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<Vec<ParsedRow>, CsvError> {
    if !is_csv_mime(content_type) {
        return Err(CsvError::InvalidFileType(
            content_type.unwrap_or("unknown").to_string(),
        ));
    }
    Ok(parse_csv(&String::from_utf8_lossy(bytes)))
}

/// Parses CSV text. The first line is the header; blank rows are dropped.
pub fn parse_csv(text: &str) -> Vec<ParsedRow> {
    let mut lines = text.split('\n');
    let headers: Vec<String> = match lines.next() {
        Some(line) => line.split(',').map(|h| h.trim().to_string()).collect(),
        None => return Vec::new(),
    };

    lines
        .map(|line| {
            let values: Vec<&str> = line.split(',').map(str::trim).collect();
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let value = values.get(i).copied().unwrap_or_default();
                    (header.clone(), value.to_string())
                })
                .collect::<ParsedRow>()
        })
        .filter(|row| !row.is_blank())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_rows_in_order() {
        let rows = parse_csv("name,age,city\nAlice,30,Paris\nBob,25,Lyon\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name"), Some("Alice"));
        assert_eq!(rows[1].get("city"), Some("Lyon"));
    }

    #[test]
    fn test_trims_headers_and_values() {
        let rows = parse_csv(" name , spend \r\n  Alice , 12.5 \r\n");
        assert_eq!(rows[0].get("name"), Some("Alice"));
        assert_eq!(rows[0].get("spend"), Some("12.5"));
    }

    #[test]
    fn test_missing_trailing_values_are_empty() {
        let rows = parse_csv("a,b,c\n1\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("a"), Some("1"));
        assert_eq!(rows[0].get("b"), Some(""));
        assert_eq!(rows[0].get("c"), Some(""));
    }

    #[test]
    fn test_extra_values_are_ignored() {
        let rows = parse_csv("a,b\n1,2,3\n");
        assert_eq!(rows[0].columns().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_blank_rows_are_dropped() {
        let rows = parse_csv("a,b\n1,2\n,\n\n   ,  \n3,\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("a"), Some("3"));
    }

    #[test]
    fn test_header_only_and_empty_input() {
        assert!(parse_csv("a,b,c").is_empty());
        assert!(parse_csv("").is_empty());
    }

    #[test]
    fn test_quoted_commas_misalign_columns() {
        let rows = parse_csv("name,city\n\"Smith, J\",Paris\n");
        assert_eq!(rows[0].get("name"), Some("\"Smith"));
        assert_eq!(rows[0].get("city"), Some("J\""));
    }

    #[test]
    fn test_duplicate_header_keeps_last_value() {
        let rows = parse_csv("a,a,b\n1,2,3\n");
        assert_eq!(rows[0].columns().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(rows[0].get("a"), Some("2"));
    }

    #[test]
    fn test_rejects_non_csv_mime() {
        let err = parse_csv_upload(Some("application/json"), b"a,b\n1,2").unwrap_err();
        assert_eq!(err, CsvError::InvalidFileType("application/json".to_string()));
        assert!(parse_csv_upload(None, b"a,b\n1,2").is_err());
    }

    #[test]
    fn test_accepts_csv_mime_with_charset() {
        let rows = parse_csv_upload(Some("text/csv; charset=utf-8"), b"a,b\n1,2").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_row_serializes_in_column_order() {
        let rows = parse_csv("z,a\n1,2\n");
        let json = serde_json::to_string(&rows[0]).unwrap();
        assert_eq!(json, r#"{"z":"1","a":"2"}"#);
    }
}
