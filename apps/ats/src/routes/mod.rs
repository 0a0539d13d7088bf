pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    routing::{get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;
use crate::{candidates, dashboard, jobs, matching, resumes};

/// Any origin; only the headers the browser client sends.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ])
}

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume intake
        .route(
            "/api/v1/resumes/parse",
            post(resumes::handlers::handle_parse_resume),
        )
        .route(
            "/api/v1/resumes/upload",
            post(resumes::handlers::handle_upload_resume),
        )
        // Matching
        .route(
            "/api/v1/matches/run",
            post(matching::handlers::handle_run_matching),
        )
        .route("/api/v1/matches", get(matching::handlers::handle_list_matches))
        .route(
            "/api/v1/matches/:id/status",
            patch(matching::handlers::handle_update_match_status),
        )
        // Candidates and jobs
        .route(
            "/api/v1/candidates",
            get(candidates::handlers::handle_list_candidates),
        )
        .route(
            "/api/v1/candidates/:id",
            get(candidates::handlers::handle_get_candidate),
        )
        .route(
            "/api/v1/jobs",
            get(jobs::handlers::handle_list_jobs).post(jobs::handlers::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handlers::handle_get_job).patch(jobs::handlers::handle_update_job),
        )
        .route("/api/v1/dashboard", get(dashboard::handle_dashboard))
        // Paths used by the existing browser client
        .route(
            "/functions/v1/parse-resume",
            post(resumes::handlers::handle_parse_resume),
        )
        .route(
            "/functions/v1/match-candidates",
            post(matching::handlers::handle_run_matching),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
        .with_state(state)
}
