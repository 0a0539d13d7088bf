//! Axum route handlers for match runs and review.

use axum::{extract::State, Json};
use bytes::Bytes;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::matching::runner::{run_matching, MatchRunRequest, MatchRunResponse};
use crate::models::matches::{MatchDetail, MatchFilter, MatchRow, MatchStatus};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchStatusUpdate {
    pub status: MatchStatus,
}

/// POST /api/v1/matches/run
///
/// An empty body scores every active job against every candidate. A body that
/// is present must decode, so a bad filter never widens into a full run.
pub async fn handle_run_matching(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MatchRunResponse>, AppError> {
    let request = parse_run_request(&body)?;
    let response = run_matching(state.store.as_ref(), state.scorer.as_ref(), request).await?;
    Ok(Json(response))
}

fn parse_run_request(body: &[u8]) -> Result<MatchRunRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(MatchRunRequest::default());
    }
    let Json(request) = Json::<MatchRunRequest>::from_bytes(body)?;
    Ok(request)
}

/// GET /api/v1/matches
pub async fn handle_list_matches(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<MatchFilter>,
) -> Result<Json<Vec<MatchDetail>>, AppError> {
    Ok(Json(state.store.list_matches(&filter).await?))
}

/// PATCH /api/v1/matches/:id/status
pub async fn handle_update_match_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(update): AppJson<MatchStatusUpdate>,
) -> Result<Json<MatchRow>, AppError> {
    let updated = state
        .store
        .update_match_status(id, update.status)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Match {id} not found")))?;

    tracing::info!(match_id = %id, status = ?updated.status, "Match reviewed");
    Ok(Json(updated))
}
