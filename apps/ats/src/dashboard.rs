//! Pipeline stats for the recruiter dashboard.

use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::error;

use crate::errors::AppError;
use crate::state::AppState;
use crate::store::PipelineCounts;

pub const TOP_SKILLS_LIMIT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    #[serde(flatten)]
    pub counts: PipelineCounts,
    pub top_skills: Vec<SkillCount>,
}

/// Most common skills, compared case-insensitively. Each skill is shown with the
/// spelling it first appeared with. Ties are broken alphabetically.
pub fn rank_skills(names: &[String], limit: usize) -> Vec<SkillCount> {
    let mut counts: HashMap<String, SkillCount> = HashMap::new();
    for name in names {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        counts
            .entry(name.to_lowercase())
            .or_insert_with(|| SkillCount {
                name: name.to_string(),
                count: 0,
            })
            .count += 1;
    }

    let mut ranked: Vec<(String, SkillCount)> = counts.into_iter().collect();
    ranked.sort_by(|(a_key, a), (b_key, b)| {
        b.count.cmp(&a.count).then_with(|| a_key.cmp(b_key))
    });
    ranked.into_iter().take(limit).map(|(_, s)| s).collect()
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    let counts = state.store.pipeline_counts().await.map_err(|e| {
        error!(error = %e, "Failed to load pipeline counts");
        AppError::Database(e)
    })?;
    let skills = state.store.candidate_skill_names().await?;

    Ok(Json(DashboardStats {
        counts,
        top_skills: rank_skills(&skills, TOP_SKILLS_LIMIT),
    }))
}
