use anyhow::{bail, Context, Result};

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173";
/// The front-end posts to `http://localhost:8000/analyze/`.
const DEFAULT_PORT: u16 = 8000;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub allowed_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
    pub llm_timeout_secs: u64,
    /// Upper bound on résumés analysed at the same time within one request.
    pub candidate_concurrency: usize,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let anthropic_api_key = require(&lookup, "ANTHROPIC_API_KEY")?;

        let allowed_origins = parse_origins(
            &lookup("ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string()),
        );

        let candidate_concurrency: usize = parse_or(&lookup, "CANDIDATE_CONCURRENCY", 4)
            .context("CANDIDATE_CONCURRENCY must be a positive integer")?;
        if candidate_concurrency == 0 {
            bail!("CANDIDATE_CONCURRENCY must be at least 1");
        }

        Ok(Config {
            anthropic_api_key,
            allowed_origins,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            llm_timeout_secs: parse_or(&lookup, "LLM_TIMEOUT_SECS", 120)
                .context("LLM_TIMEOUT_SECS must be a number of seconds")?,
            candidate_concurrency,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 20 * 1024 * 1024)
                .context("MAX_UPLOAD_BYTES must be a number of bytes")?,
        })
    }
}

fn require<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => bail!("Required environment variable '{key}' is not set"),
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => Ok(raw.trim().parse::<T>()?),
        None => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect()
}
