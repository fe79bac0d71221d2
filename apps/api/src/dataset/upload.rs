//! Multipart form reading shared by the dataset, strategy and wizard routes.

use axum::extract::Multipart;
use bytes::Bytes;
use tracing::debug;

use crate::dataset::{parse_csv_upload, ParsedRow};
use crate::errors::AppError;
use crate::models::answers::UserAnswers;

/// Multipart field carrying the CSV file.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Validates the declared type and parses the rows.
    pub fn parse(&self) -> Result<Vec<ParsedRow>, AppError> {
        let rows = parse_csv_upload(self.content_type.as_deref(), &self.bytes)?;
        debug!(
            "Parsed {} rows from {}",
            rows.len(),
            self.file_name.as_deref().unwrap_or("upload")
        );
        Ok(rows)
    }
}

/// Answers and an optional file, as posted by the one-shot strategy form.
#[derive(Debug, Default)]
pub struct ProfileForm {
    pub answers: UserAnswers,
    pub file: Option<UploadedFile>,
}

/// Reads every field of a multipart body. Unknown text fields are ignored.
pub async fn read_profile_form(mut multipart: Multipart) -> Result<ProfileForm, AppError> {
    let mut form = ProfileForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == FILE_FIELD {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            // Browsers send an empty, nameless part when no file was picked.
            if bytes.is_empty() && file_name.as_deref().unwrap_or_default().is_empty() {
                continue;
            }
            form.file = Some(UploadedFile {
                file_name,
                content_type,
                bytes,
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read field '{name}': {e}")))?;
        match name.as_str() {
            "product" => form.answers.product = value,
            "budget" => form.answers.budget = value,
            "customers" => form.answers.customers = value,
            "growthGoal" => form.answers.growth_goal = value,
            _ => debug!("Ignoring unknown form field '{name}'"),
        }
    }

    Ok(form)
}

/// Reads a multipart body that must carry a file.
pub async fn read_file(multipart: Multipart) -> Result<UploadedFile, AppError> {
    read_profile_form(multipart)
        .await?
        .file
        .ok_or_else(|| AppError::Validation(format!("Missing '{FILE_FIELD}' field")))
}
