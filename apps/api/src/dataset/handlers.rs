//! Axum route handlers for the Dataset API.

use axum::{extract::Multipart, Json};
use serde::Serialize;

use crate::dataset::upload::read_file;
use crate::dataset::{analyze_rows, CsvInsight};
use crate::errors::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub file_name: Option<String>,
    pub row_count: usize,
    pub insight: CsvInsight,
}

/// POST /api/v1/datasets/analyze
///
/// Parses an uploaded CSV and returns its column summary. Non-CSV uploads
/// are rejected with 415 before any parsing.
pub async fn handle_analyze(multipart: Multipart) -> Result<Json<AnalyzeResponse>, AppError> {
    let file = read_file(multipart).await?;
    let rows = file.parse()?;

    Ok(Json(AnalyzeResponse {
        file_name: file.file_name,
        row_count: rows.len(),
        insight: analyze_rows(&rows),
    }))
}
