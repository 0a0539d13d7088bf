//! Resume upload: store the file, pull its text, then hand over to the parser.
//!
//! Matching for the new candidate is started in the background and not awaited,
//! so the upload answers as soon as the candidate row exists.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::matching::runner::spawn_matching_for_candidate;
use crate::models::candidate::CandidateRow;
use crate::resumes::parser::{parse_resume, ParseResumeRequest};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    PlainText,
}

impl ResumeFormat {
    /// Detects the format from the declared content type, falling back to the
    /// file extension.
    pub fn detect(file_name: &str, content_type: Option<&str>) -> Option<Self> {
        match content_type.map(|c| c.trim().to_ascii_lowercase()).as_deref() {
            Some("application/pdf") => return Some(ResumeFormat::Pdf),
            Some(c) if c.starts_with("text/plain") => return Some(ResumeFormat::PlainText),
            _ => {}
        }

        let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(ResumeFormat::Pdf),
            "txt" | "text" | "md" => Some(ResumeFormat::PlainText),
            _ => None,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ResumeFormat::Pdf => "application/pdf",
            ResumeFormat::PlainText => "text/plain; charset=utf-8",
        }
    }
}

pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub candidate: CandidateRow,
    pub parsed_data: Value,
    pub resume_url: String,
}

/// Extracts plain text from a resume file. PDF parsing runs on the blocking pool.
pub async fn extract_text(format: ResumeFormat, body: Bytes) -> Result<String, AppError> {
    let text = match format {
        ResumeFormat::PlainText => String::from_utf8_lossy(&body).into_owned(),
        ResumeFormat::Pdf => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&body).map_err(|e| e.to_string())
        })
        .await
        .map_err(|_| AppError::Validation("Could not read PDF file".to_string()))?
        .map_err(|e| AppError::Validation(format!("Could not read PDF file: {e}")))?,
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation(
            "No text could be extracted from the file".to_string(),
        ));
    }
    Ok(text.to_string())
}

/// `resumes/<unix millis>-<sanitized file name>`
pub fn object_key(file_name: &str, now: DateTime<Utc>) -> String {
    let sanitized: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let sanitized = sanitized.trim_matches(|c| c == '-' || c == '.');
    let name = if sanitized.is_empty() {
        "resume"
    } else {
        sanitized
    };
    format!("resumes/{}-{}", now.timestamp_millis(), name)
}

pub async fn ingest_upload(state: &AppState, file: UploadedFile) -> Result<UploadResponse, AppError> {
    let format = ResumeFormat::detect(&file.file_name, file.content_type.as_deref())
        .ok_or_else(|| {
            AppError::Validation(format!(
                "Unsupported file type for '{}'. Upload a PDF or plain-text resume.",
                file.file_name
            ))
        })?;

    let resume_text = extract_text(format, file.body.clone()).await?;

    let key = object_key(&file.file_name, Utc::now());
    let resume_url = state
        .storage
        .put(&key, file.body, format.content_type())
        .await?;

    let parsed = parse_resume(
        state.store.as_ref(),
        state.extractor.as_ref(),
        ParseResumeRequest {
            resume_text,
            resume_url: Some(resume_url.clone()),
            file_name: file.file_name,
        },
    )
    .await?;

    info!(candidate_id = %parsed.candidate.id, "Starting background matching for uploaded resume");
    spawn_matching_for_candidate(
        state.store.clone(),
        state.scorer.clone(),
        parsed.candidate.id,
    );

    Ok(UploadResponse {
        candidate: parsed.candidate,
        parsed_data: parsed.parsed_data,
        resume_url,
    })
}
