use axum::{extract::State, http::StatusCode, Json};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::jobs::{prepare_new_job, prepare_update};
use crate::models::job::{JobRow, JobUpdate, NewJob};
use crate::state::AppState;

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    Ok(Json(state.store.list_jobs().await?))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    state
        .store
        .get_job(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    AppJson(job): AppJson<NewJob>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    let job = prepare_new_job(job)?;
    let created = state.store.create_job(job).await?;
    info!(job_id = %created.id, status = ?created.status, "Job created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(update): AppJson<JobUpdate>,
) -> Result<Json<JobRow>, AppError> {
    let not_found = || AppError::NotFound(format!("Job {id} not found"));

    let existing = state.store.get_job(id).await?.ok_or_else(not_found)?;
    let update = prepare_update(&existing, update)?;

    let updated = state.store.update_job(id, update).await?.ok_or_else(not_found)?;
    info!(job_id = %id, "Job updated");
    Ok(Json(updated))
}
