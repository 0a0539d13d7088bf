//! Axum route handlers for resume intake.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::resumes::parser::{parse_resume, ParseResumeRequest, ParseResumeResponse};
use crate::resumes::upload::{ingest_upload, UploadResponse, UploadedFile};
use crate::state::AppState;

/// POST /api/v1/resumes/parse
///
/// Parses raw resume text into a new candidate.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    AppJson(request): AppJson<ParseResumeRequest>,
) -> Result<Json<ParseResumeResponse>, AppError> {
    let response = parse_resume(state.store.as_ref(), state.extractor.as_ref(), request).await?;
    Ok(Json(response))
}

/// POST /api/v1/resumes/upload
///
/// Multipart upload with a single `file` field (PDF or plain text).
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart?;
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume").to_string();
        let content_type = field.content_type().map(str::to_string);
        let body = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;
        upload = Some(UploadedFile {
            file_name,
            content_type,
            body,
        });
        break;
    }

    let file = upload
        .ok_or_else(|| AppError::Validation("Multipart field 'file' is required".to_string()))?;

    Ok(Json(ingest_upload(&state, file).await?))
}
