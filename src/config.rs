//! Runtime configuration read from the environment (and `.env`).

use anyhow::{Context, Result};
use secrecy::Secret;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://clips.db?mode=rwc";
pub const DEFAULT_YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_CLIP_OFFSET_SECONDS: u32 = 35;
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug)]
pub struct Settings {
    pub database_url: String,
    pub port: u16,
    pub youtube_api_key: Secret<String>,
    pub youtube_api_base_url: String,
    pub default_channel_id: Option<String>,
    pub default_channel_name: Option<String>,
    pub discord_webhook_url: Option<String>,
    pub admin_key: Option<Secret<String>>,
    pub clip_offset_seconds: u32,
    pub http_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let youtube_api_key = get("YT_API_KEY").context("YT_API_KEY must be set")?;

        let port = match get("PORT") {
            Some(v) => v.parse::<u16>().with_context(|| format!("Invalid PORT: {}", v))?,
            None => DEFAULT_PORT,
        };

        let clip_offset_seconds = match get("CLIP_OFFSET_SECONDS") {
            Some(v) => v
                .parse::<u32>()
                .with_context(|| format!("Invalid CLIP_OFFSET_SECONDS: {}", v))?,
            None => DEFAULT_CLIP_OFFSET_SECONDS,
        };

        let http_timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(v) => v
                .parse::<u64>()
                .with_context(|| format!("Invalid HTTP_TIMEOUT_SECS: {}", v))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            port,
            youtube_api_key: Secret::new(youtube_api_key),
            youtube_api_base_url: get("YT_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_YOUTUBE_API_BASE_URL.to_string()),
            default_channel_id: get("YT_CHANNEL_ID"),
            default_channel_name: get("YT_CHANNEL_NAME"),
            discord_webhook_url: get("DISCORD_WEBHOOK"),
            admin_key: get("ADMIN_KEY").map(Secret::new),
            clip_offset_seconds,
            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }
}
