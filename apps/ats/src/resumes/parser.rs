//! Resume Parser: turns raw resume text into a persisted `Candidate`.
//!
//! Flow: validate → `ResumeExtractor::extract` → defaults → INSERT → response.
//! The extractor is a trait so tests can replace the AI call with a fixed answer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::ai_client::{render_prompt, AiClient, AiError};
use crate::errors::AppError;
use crate::models::candidate::{
    CandidateRow, EducationEntry, NewCandidate, Skill, WorkExperienceEntry,
};
use crate::models::lenient;
use crate::resumes::prompts::{
    extract_resume_tool, RESUME_PARSE_PROMPT_TEMPLATE, RESUME_PARSE_SYSTEM,
};
use crate::store::Store;

const PARSE_FAILURE: &str = "Failed to parse resume with AI";

/// Extraction capability. Returns the raw structured object produced for the
/// resume, before any defaulting.
#[async_trait]
pub trait ResumeExtractor: Send + Sync {
    async fn extract(&self, resume_text: &str) -> Result<Value, AiError>;
}

/// Extractor backed by the chat-completion API and the `extract_resume_data` tool.
pub struct AiResumeExtractor(pub AiClient);

#[async_trait]
impl ResumeExtractor for AiResumeExtractor {
    async fn extract(&self, resume_text: &str) -> Result<Value, AiError> {
        let prompt = render_prompt(RESUME_PARSE_PROMPT_TEMPLATE, &[("resume_text", resume_text)]);
        self.0
            .call_tool(RESUME_PARSE_SYSTEM, &prompt, &extract_resume_tool())
            .await
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResumeRequest {
    #[serde(default)]
    pub resume_text: String,
    pub resume_url: Option<String>,
    #[serde(default)]
    pub file_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResumeResponse {
    pub candidate: CandidateRow,
    pub parsed_data: Value,
}

/// Typed view of the extraction result. Only `full_name` and `email` are
/// mandatory; every other field decodes leniently and is defaulted on insert.
#[derive(Debug, Clone, Deserialize)]
pub struct ParsedResume {
    pub full_name: String,
    pub email: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient::years")]
    pub experience_years: Option<f64>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub education: Option<Vec<EducationEntry>>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub work_experience: Option<Vec<WorkExperienceEntry>>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub skills: Option<Vec<Skill>>,
}

impl ParsedResume {
    pub fn into_new_candidate(
        self,
        resume_url: Option<String>,
        resume_text: String,
        parsed_at: DateTime<Utc>,
    ) -> NewCandidate {
        NewCandidate {
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            location: self.location,
            summary: self.summary,
            experience_years: whole_years(self.experience_years),
            education: self.education.unwrap_or_default(),
            work_experience: self.work_experience.unwrap_or_default(),
            skills: self.skills.unwrap_or_default(),
            resume_url,
            resume_text: Some(resume_text),
            parsed_at,
        }
    }
}

fn whole_years(years: Option<f64>) -> i32 {
    years
        .filter(|y| y.is_finite())
        .map(|y| y.round().clamp(0.0, 100.0) as i32)
        .unwrap_or(0)
}

/// Parses one resume and inserts exactly one candidate row.
/// Nothing is written when validation, the AI call or response decoding fails.
pub async fn parse_resume(
    store: &dyn Store,
    extractor: &dyn ResumeExtractor,
    request: ParseResumeRequest,
) -> Result<ParseResumeResponse, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("Resume text is required".to_string()));
    }

    info!(file_name = %request.file_name, "Parsing resume");

    let parsed_data = extractor
        .extract(&request.resume_text)
        .await
        .map_err(|e| AppError::from_ai(e, PARSE_FAILURE))?;

    let parsed: ParsedResume = serde_json::from_value(parsed_data.clone())
        .map_err(|e| AppError::MalformedAiResponse(e.to_string()))?;
    info!("Parsed resume data: {}", parsed.full_name);

    let new_candidate =
        parsed.into_new_candidate(request.resume_url, request.resume_text, Utc::now());
    let candidate = store.insert_candidate(new_candidate).await?;

    info!(candidate_id = %candidate.id, "Candidate saved");

    Ok(ParseResumeResponse {
        candidate,
        parsed_data,
    })
}
