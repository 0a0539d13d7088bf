mod ai_client;
mod candidates;
mod config;
mod dashboard;
mod db;
mod errors;
mod extract;
mod jobs;
mod matching;
mod models;
mod resumes;
mod routes;
mod state;
mod storage;
mod store;
#[cfg(test)]
mod testing;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai_client::AiClient;
use crate::config::{Config, StorageConfig};
use crate::db::{create_pool, run_migrations};
use crate::matching::scorer::AiMatchScorer;
use crate::resumes::parser::AiResumeExtractor;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::S3ResumeStorage;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    init_tracing(&config);

    info!("Starting ATS API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config.storage).await;
    info!("S3 client initialized (bucket: {})", config.storage.bucket);

    // Initialize AI client
    let ai = AiClient::new(&config.ai)?;
    info!("AI client initialized (model: {})", ai.model());

    let state = AppState {
        store: Arc::new(PgStore::new(db)),
        extractor: Arc::new(AiResumeExtractor(ai.clone())),
        scorer: Arc::new(AiMatchScorer(ai)),
        storage: Arc::new(S3ResumeStorage::new(s3, &config.storage)),
    };

    let app = build_router(state, config.max_upload_bytes);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
    });

    if config.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &StorageConfig) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.access_key_id,
        &config.secret_access_key,
        None,
        None,
        "ats-static",
    );

    let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .credentials_provider(credentials)
        .endpoint_url(&config.endpoint)
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&shared)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
