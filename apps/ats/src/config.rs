use anyhow::{Context, Result};

const DEFAULT_AI_BASE_URL: &str = "https://ai.gateway.lovable.dev/v1";
const DEFAULT_AI_MODEL: &str = "google/gemini-2.5-flash";

/// Application configuration loaded from environment variables.
/// Startup aborts if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub ai: AiConfig,
    pub storage: StorageConfig,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
    pub json_logs: bool,
}

/// Settings for the structured-output chat-completion API.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

/// Settings for the resume file bucket (S3 or MinIO).
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Base used to build the public URL of an uploaded object.
    pub public_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let endpoint = require_env("S3_ENDPOINT")?;
        let bucket = require_env("S3_BUCKET")?;
        let public_url = std::env::var("S3_PUBLIC_URL")
            .unwrap_or_else(|_| format!("{}/{}", endpoint.trim_end_matches('/'), bucket));

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            ai: AiConfig {
                api_key: require_env("AI_API_KEY")?,
                base_url: optional_env("AI_BASE_URL", DEFAULT_AI_BASE_URL),
                model: optional_env("AI_MODEL", DEFAULT_AI_MODEL),
                timeout_secs: parse_env("AI_TIMEOUT_SECS", 120)?,
            },
            storage: StorageConfig {
                bucket,
                endpoint,
                region: optional_env("S3_REGION", "us-east-1"),
                access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
                public_url,
            },
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG", "info"),
            json_logs: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number")),
        Err(_) => Ok(default),
    }
}
