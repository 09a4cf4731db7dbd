use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Directory where uploaded CV files are stored.
    pub uploads_dir: String,
    /// Sliding idle timeout for cached permission sets.
    pub permission_cache_idle: Duration,
    /// Hard ceiling on cached permission set lifetime.
    pub permission_cache_absolute: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            uploads_dir: std::env::var("UPLOADS_DIR")
                .unwrap_or_else(|_| "uploads/cv".to_string()),
            permission_cache_idle: Duration::from_secs(env_u64(
                "PERMISSION_CACHE_IDLE_SECS",
                600,
            )?),
            permission_cache_absolute: Duration::from_secs(env_u64(
                "PERMISSION_CACHE_ABSOLUTE_SECS",
                3600,
            )?),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_u64(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .with_context(|| format!("{key} must be a non-negative integer")),
        Err(_) => Ok(default),
    }
}
