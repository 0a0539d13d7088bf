use axum::{extract::State, Json};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::AppPath;
use crate::models::candidate::CandidateRow;
use crate::state::AppState;

/// GET /api/v1/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
) -> Result<Json<Vec<CandidateRow>>, AppError> {
    Ok(Json(state.store.list_candidates().await?))
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<CandidateRow>, AppError> {
    state
        .store
        .get_candidate(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))
}
