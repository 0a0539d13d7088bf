//! Match Scoring: pluggable scorer that rates one candidate against one job.
//!
//! Default: `AiMatchScorer` (chat-completion API with the `calculate_match` tool).
//! `AppState` holds an `Arc<dyn MatchScorer>` so tests can use a fixed scorer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ai_client::{render_prompt, AiClient, AiError};
use crate::matching::prompts::{calculate_match_tool, MATCH_PROMPT_TEMPLATE, MATCH_SYSTEM};
use crate::models::candidate::CandidateRow;
use crate::models::job::JobRow;

/// Structured verdict for a single candidate/job pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchAssessment {
    pub match_score: f64,
    #[serde(default)]
    pub matched_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub experience_match: bool,
    pub notes: Option<String>,
}

impl MatchAssessment {
    /// Score as stored: rounded and held to 0–100.
    pub fn bounded_score(&self) -> i32 {
        if self.match_score.is_finite() {
            self.match_score.round().clamp(0.0, 100.0) as i32
        } else {
            0
        }
    }
}

#[async_trait]
pub trait MatchScorer: Send + Sync {
    async fn score(&self, candidate: &CandidateRow, job: &JobRow)
        -> Result<MatchAssessment, AiError>;
}

pub struct AiMatchScorer(pub AiClient);

#[async_trait]
impl MatchScorer for AiMatchScorer {
    async fn score(
        &self,
        candidate: &CandidateRow,
        job: &JobRow,
    ) -> Result<MatchAssessment, AiError> {
        let prompt = build_match_prompt(candidate, job);
        self.0
            .call_tool_as::<MatchAssessment>(MATCH_SYSTEM, &prompt, &calculate_match_tool())
            .await
    }
}

pub fn build_match_prompt(candidate: &CandidateRow, job: &JobRow) -> String {
    let experience_range = format!(
        "{}-{}",
        job.experience_min,
        job.experience_max
            .map(|max| max.to_string())
            .unwrap_or_else(|| "any".to_string())
    );

    let candidate_experience = candidate.experience_years.to_string();
    let candidate_skills = candidate.skill_names().join(", ");
    let required_skills = job.required_skills.join(", ");
    let preferred_skills = job.preferred_skills.join(", ");

    render_prompt(
        MATCH_PROMPT_TEMPLATE,
        &[
            ("candidate_name", candidate.full_name.as_str()),
            ("candidate_experience", candidate_experience.as_str()),
            ("candidate_skills", candidate_skills.as_str()),
            ("candidate_summary", candidate.summary.as_deref().unwrap_or("N/A")),
            ("job_title", job.title.as_str()),
            ("job_company", job.company.as_str()),
            ("required_skills", required_skills.as_str()),
            ("preferred_skills", preferred_skills.as_str()),
            ("experience_range", experience_range.as_str()),
            ("job_description", job.description.as_deref().unwrap_or("N/A")),
        ],
    )
}
