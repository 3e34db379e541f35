//! Axum route handlers for the Analysis API.
//!
//! Two input shapes converge on `run_analysis`: a multipart PDF upload and a JSON body
//! carrying the resume as text.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::analysis::pipeline::run_analysis;
use crate::errors::AppError;
use crate::extraction::extract_pdf_text_blocking;
use crate::models::analysis::{AnalysisRequest, AnalysisResult};
use crate::state::AppState;

const CV_FIELD: &str = "cv_file";
const JOB_DESCRIPTION_FIELD: &str = "job_description";

/// A PDF resume as received in the multipart body.
struct UploadedCv {
    filename: String,
    data: Bytes,
}

/// POST /api/analyze
///
/// Multipart form with `cv_file` (PDF) and `job_description` (text).
/// The file name is checked before any extraction is attempted.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let mut cv: Option<UploadedCv> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            CV_FIELD => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                cv = Some(UploadedCv { filename, data });
            }
            JOB_DESCRIPTION_FIELD => job_description = Some(field.text().await?),
            _ => {} // unknown fields are ignored
        }
    }

    let cv = cv.ok_or_else(|| AppError::Validation("CV file is required".to_string()))?;
    info!("Received CV file: {}, size: {}", cv.filename, cv.data.len());

    if !cv.filename.ends_with(".pdf") {
        return Err(AppError::InvalidFileType);
    }

    let job_description = job_description
        .filter(|jd| !jd.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Job description is required".to_string()))?;

    let resume_text = extract_pdf_text_blocking(cv.data).await?;

    let result = run_analysis(state.agent.as_ref(), &resume_text, &job_description).await?;
    Ok(Json(result))
}

/// POST /analyze
///
/// JSON body `{resume, job_description}`; no extraction step.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let result = run_analysis(
        state.agent.as_ref(),
        &request.resume,
        &request.job_description,
    )
    .await?;
    Ok(Json(result))
}
