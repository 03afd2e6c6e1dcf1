use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Root of persisted uploads; photos live under `<data_dir>/photos`.
    pub data_dir: PathBuf,
    /// The single font bundled for server-side panel rasterization.
    pub font_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            font_path: std::env::var("FONT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("assets/fonts/Inter.ttf")),
        })
    }

    pub fn original_photos_dir(&self) -> PathBuf {
        self.data_dir.join("photos").join("original")
    }

    pub fn small_photos_dir(&self) -> PathBuf {
        self.data_dir.join("photos").join("small")
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
