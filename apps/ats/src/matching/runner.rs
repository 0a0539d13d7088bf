//! Match run: scores every unscored (active job, candidate) pair, one at a time.
//!
//! A failing pair is logged and skipped; only the initial job/candidate fetch can
//! fail the run as a whole.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::scorer::MatchScorer;
use crate::models::candidate::CandidateRow;
use crate::models::matches::{MatchRow, NewMatch};
use crate::store::Store;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRunRequest {
    pub job_id: Option<Uuid>,
    pub candidate_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct MatchRunResponse {
    pub matches: Vec<MatchRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MatchRunResponse {
    fn nothing_to_score(message: &str) -> Self {
        Self {
            matches: Vec::new(),
            count: None,
            message: Some(message.to_string()),
        }
    }

    fn created(matches: Vec<MatchRow>) -> Self {
        Self {
            count: Some(matches.len()),
            matches,
            message: None,
        }
    }
}

pub async fn run_matching(
    store: &dyn Store,
    scorer: &dyn MatchScorer,
    request: MatchRunRequest,
) -> Result<MatchRunResponse, AppError> {
    let jobs = store.active_jobs(request.job_id).await.map_err(|e| {
        error!(error = %e, "Failed to fetch jobs");
        AppError::Database(e)
    })?;
    if jobs.is_empty() {
        return Ok(MatchRunResponse::nothing_to_score("No jobs found"));
    }

    let candidates = load_candidates(store, request.candidate_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch candidates");
            AppError::Database(e)
        })?;
    if candidates.is_empty() {
        return Ok(MatchRunResponse::nothing_to_score("No candidates found"));
    }

    info!(
        "Matching {} candidates with {} jobs",
        candidates.len(),
        jobs.len()
    );

    let mut created = Vec::new();

    for job in &jobs {
        for candidate in &candidates {
            match store.match_exists(candidate.id, job.id).await {
                Ok(true) => {
                    debug!(candidate_id = %candidate.id, job_id = %job.id, "Match already exists");
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(candidate_id = %candidate.id, job_id = %job.id, error = %e, "Match lookup failed; skipping pair");
                    continue;
                }
            }

            let assessment = match scorer.score(candidate, job).await {
                Ok(a) => a,
                Err(e) => {
                    warn!(candidate_id = %candidate.id, job_id = %job.id, error = %e, "AI matching failed; skipping pair");
                    continue;
                }
            };

            let match_score = assessment.bounded_score();
            info!(
                "Match: {} -> {}: {}%",
                candidate.full_name, job.title, match_score
            );

            let new_match = NewMatch {
                candidate_id: candidate.id,
                job_id: job.id,
                match_score,
                matched_skills: assessment.matched_skills,
                missing_skills: assessment.missing_skills,
                experience_match: assessment.experience_match,
                notes: assessment.notes,
            };

            match store.insert_match(new_match).await {
                Ok(Some(row)) => created.push(row),
                Ok(None) => {
                    info!(candidate_id = %candidate.id, job_id = %job.id, "Pair scored concurrently; keeping existing match");
                }
                Err(e) => {
                    error!(candidate_id = %candidate.id, job_id = %job.id, error = %e, "Failed to save match");
                }
            }
        }
    }

    info!("Created {} new matches", created.len());
    Ok(MatchRunResponse::created(created))
}

async fn load_candidates(
    store: &dyn Store,
    candidate_id: Option<Uuid>,
) -> Result<Vec<CandidateRow>, sqlx::Error> {
    match candidate_id {
        Some(id) => Ok(store.get_candidate(id).await?.into_iter().collect()),
        None => store.list_candidates().await,
    }
}

/// Scores a freshly created candidate against all active jobs without blocking
/// the caller.
pub fn spawn_matching_for_candidate(
    store: Arc<dyn Store>,
    scorer: Arc<dyn MatchScorer>,
    candidate_id: Uuid,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let request = MatchRunRequest {
            job_id: None,
            candidate_id: Some(candidate_id),
        };
        match run_matching(store.as_ref(), scorer.as_ref(), request).await {
            Ok(response) => info!(
                %candidate_id,
                created = response.matches.len(),
                "Background matching finished"
            ),
            Err(e) => warn!(%candidate_id, error = %e, "Background matching failed"),
        }
    })
}
