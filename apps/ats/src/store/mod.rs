//! Persistence seam. Handlers and pipelines only see `dyn Store`; production uses
//! `PgStore`, tests use the in-memory implementation.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::candidate::{CandidateRow, NewCandidate};
use crate::models::job::{JobRow, JobUpdate, NewJob};
use crate::models::matches::{MatchDetail, MatchFilter, MatchRow, MatchStatus, NewMatch};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

/// Row counts backing the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
pub struct PipelineCounts {
    pub total_candidates: i64,
    pub resumes_parsed: i64,
    pub active_jobs: i64,
    pub total_matches: i64,
    pub pending_matches: i64,
    pub average_match_score: Option<f64>,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_candidate(&self, candidate: NewCandidate) -> Result<CandidateRow, sqlx::Error>;

    /// All candidates, newest first.
    async fn list_candidates(&self) -> Result<Vec<CandidateRow>, sqlx::Error>;

    async fn get_candidate(&self, id: Uuid) -> Result<Option<CandidateRow>, sqlx::Error>;

    /// All jobs, newest first.
    async fn list_jobs(&self) -> Result<Vec<JobRow>, sqlx::Error>;

    async fn get_job(&self, id: Uuid) -> Result<Option<JobRow>, sqlx::Error>;

    /// Jobs with status `active`, narrowed to `id` when given.
    async fn active_jobs(&self, id: Option<Uuid>) -> Result<Vec<JobRow>, sqlx::Error>;

    async fn create_job(&self, job: NewJob) -> Result<JobRow, sqlx::Error>;

    async fn update_job(&self, id: Uuid, update: JobUpdate)
        -> Result<Option<JobRow>, sqlx::Error>;

    async fn match_exists(&self, candidate_id: Uuid, job_id: Uuid) -> Result<bool, sqlx::Error>;

    /// Insert-or-ignore on (candidate_id, job_id). `None` means the pair was
    /// already scored.
    async fn insert_match(&self, new_match: NewMatch) -> Result<Option<MatchRow>, sqlx::Error>;

    /// Matches ordered by score, best first.
    async fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchDetail>, sqlx::Error>;

    async fn update_match_status(
        &self,
        id: Uuid,
        status: MatchStatus,
    ) -> Result<Option<MatchRow>, sqlx::Error>;

    async fn pipeline_counts(&self) -> Result<PipelineCounts, sqlx::Error>;

    /// One entry per skill per candidate.
    async fn candidate_skill_names(&self) -> Result<Vec<String>, sqlx::Error>;
}
