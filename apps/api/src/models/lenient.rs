//! Forgiving deserializers for remotely generated strategy payloads.
//!
//! The model is told the schema but nothing guarantees it follows it. These
//! helpers coerce near-misses (numbers as strings, floats for integers, nulls
//! for lists) and clamp out-of-range values so the rest of the crate can rely
//! on the typed `StrategyData` shape.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a JSON number or a numeric string such as `"$1,200"` or `"35%"`.
pub fn number_from_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .trim()
            .trim_start_matches('$')
            .trim_end_matches('%')
            .replace(',', "")
            .trim()
            .parse::<f64>()
            .ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Whole, non-negative amount. Anything unreadable becomes 0.
pub fn non_negative<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value)
        .map(|n| n.round().max(0.0) as u64)
        .unwrap_or(0))
}

/// Whole percentage clamped to `[0, 100]`.
pub fn percentage<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value)
        .map(|n| n.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0))
}

pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(string_from_value(&value).unwrap_or_default())
}

pub fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(string_from_value(&value).filter(|s| !s.is_empty()))
}

/// Campaign timelines are `"<N> weeks"`; a bare number gets the unit appended.
pub fn timeline<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => format!("{n} weeks"),
        other => string_from_value(&other).unwrap_or_default(),
    })
}

/// List of strings; non-string scalars are stringified, nested values dropped.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .iter()
            .filter_map(string_from_value)
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    })
}

/// List of objects; `null` or a non-array becomes empty, entries that do not
/// fit `T` are skipped.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn string_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_from_value_accepts_currency_strings() {
        assert_eq!(number_from_value(&Value::from("$1,200")), Some(1200.0));
        assert_eq!(number_from_value(&Value::from("35%")), Some(35.0));
        assert_eq!(number_from_value(&Value::from(12.5)), Some(12.5));
    }

    #[test]
    fn test_number_from_value_rejects_text() {
        assert_eq!(number_from_value(&Value::from("lots")), None);
        assert_eq!(number_from_value(&Value::Null), None);
        assert_eq!(number_from_value(&Value::Bool(true)), None);
    }
}
