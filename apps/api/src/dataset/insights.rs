use std::collections::HashSet;

use serde::Serialize;

use crate::dataset::csv::ParsedRow;

/// Rows echoed back to the prompt and the client.
pub const SAMPLE_ROWS: usize = 5;
/// Distinct values listed in a categorical insight.
const TOP_CATEGORIES: usize = 3;
/// Above this many rows the dataset is flagged as usable for segmentation.
const SEGMENTATION_MIN_ROWS: usize = 10;

/// Column-level summary of an uploaded dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvInsight {
    pub total_rows: usize,
    pub columns: Vec<String>,
    pub sample_data: Vec<ParsedRow>,
    pub insights: Vec<String>,
}

impl CsvInsight {
    pub fn is_empty(&self) -> bool {
        self.total_rows == 0
    }
}

/// Summarizes parsed rows. Numeric columns report mean and range; columns
/// with a handful of repeated values report their categories.
pub fn analyze_rows(rows: &[ParsedRow]) -> CsvInsight {
    let Some(first) = rows.first() else {
        return CsvInsight::default();
    };

    let columns: Vec<String> = first.columns().map(str::to_string).collect();
    let mut insights = Vec::new();

    for column in &columns {
        let numbers: Vec<f64> = rows
            .iter()
            .filter_map(|row| row.get(column))
            .filter_map(parse_number)
            .collect();
        if let Some(summary) = numeric_summary(column, &numbers) {
            insights.push(summary);
        }
    }

    for column in &columns {
        let categories = distinct_values(rows, column);
        if categories.len() > 1 && categories.len() < rows.len() {
            let top: Vec<&str> = categories.iter().take(TOP_CATEGORIES).copied().collect();
            insights.push(format!(
                "{column}: {} unique categories - Top: {}",
                categories.len(),
                top.join(", ")
            ));
        }
    }

    if rows.len() > SEGMENTATION_MIN_ROWS {
        insights.push(format!(
            "Dataset size: {} records - suitable for segmentation analysis",
            rows.len()
        ));
    }

    CsvInsight {
        total_rows: rows.len(),
        columns,
        sample_data: rows.iter().take(SAMPLE_ROWS).cloned().collect(),
        insights,
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn numeric_summary(column: &str, numbers: &[f64]) -> Option<String> {
    if numbers.is_empty() {
        return None;
    }
    let mean = numbers.iter().sum::<f64>() / numbers.len() as f64;
    let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
    let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(format!(
        "{column}: Average {mean:.2} (Range: {}-{})",
        format_number(min),
        format_number(max)
    ))
}

/// Non-empty values of a column in first-seen order.
fn distinct_values<'a>(rows: &'a [ParsedRow], column: &str) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(|row| row.get(column))
        .filter(|value| !value.is_empty())
        .filter(|value| seen.insert(*value))
        .collect()
}

/// Whole numbers print without a fractional part.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
