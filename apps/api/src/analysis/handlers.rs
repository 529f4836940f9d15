//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::analysis::models::CandidateResult;
use crate::analysis::pipeline::UploadedCv;
use crate::errors::AppError;
use crate::state::AppState;

/// Parsed `multipart/form-data` body of an analysis request.
#[derive(Debug)]
pub struct AnalyzeForm {
    pub job_description: String,
    pub cvs: Vec<UploadedCv>,
}

/// POST /analyze/
///
/// Multipart fields: `job_description` (text) and one or more `cvs` files.
/// Returns candidates ranked by score, best first.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Vec<CandidateResult>>, AppError> {
    let form = parse_analyze_form(multipart).await?;
    let results = state
        .pipeline
        .analyze(&form.job_description, form.cvs)
        .await?;
    Ok(Json(results))
}

pub async fn parse_analyze_form(mut multipart: Multipart) -> Result<AnalyzeForm, AppError> {
    let mut job_description: Option<String> = None;
    let mut cvs = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read form field: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "job_description" => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read job_description: {e}"))
                })?;
                job_description = Some(text);
            }
            "cvs" => {
                let filename = field.file_name().unwrap_or("unknown").to_string();
                let data = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read file '{filename}': {e}"))
                })?;
                cvs.push(UploadedCv { filename, data });
            }
            other => {
                field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read form field '{other}': {e}"))
                })?;
            }
        }
    }

    let job_description = job_description
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| AppError::Validation("job_description is required".to_string()))?;

    if cvs.is_empty() {
        return Err(AppError::Validation(
            "At least one file must be uploaded in 'cvs'".to_string(),
        ));
    }

    Ok(AnalyzeForm {
        job_description,
        cvs,
    })
}
