use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::candidate::CandidateSummary;
use crate::models::job::JobSummary;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "match_status", rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub match_score: i32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub experience_match: bool,
    pub notes: Option<String>,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for the `matches` table. Always starts out `pending`.
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub match_score: i32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub experience_match: bool,
    pub notes: Option<String>,
}

/// A match with the candidate and job summaries the review screen needs.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MatchDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub record: MatchRow,
    pub candidate: Json<CandidateSummary>,
    pub job: Json<JobSummary>,
}

/// Query filters for `GET /api/v1/matches`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchFilter {
    pub status: Option<MatchStatus>,
    pub job_id: Option<Uuid>,
    pub candidate_id: Option<Uuid>,
}
