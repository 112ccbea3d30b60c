//! YouTube Data API client.
//!
//! Two lookups back the clip pipeline: a per-channel live search
//! (`search?eventType=live`) used to find which tracked channel is
//! broadcasting, and a `videos?part=liveStreamingDetails` lookup for the
//! broadcast's actual start time. Both absorb upstream failures: a failing
//! channel counts as "not live" and a failing detail lookup as "start unknown".

use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::db::channels::Channel;
use crate::errors::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: SearchResultId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub live_streaming_details: Option<LiveStreamingDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStreamingDetails {
    pub actual_start_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveStream {
    pub video_id: String,
    pub channel_id: String,
}

#[derive(Clone, Debug)]
pub struct YoutubeClient {
    http_client: Client,
    base_url: String,
    api_key: Arc<Secret<String>>,
}

impl YoutubeClient {
    pub fn new(http_client: Client, base_url: impl Into<String>, api_key: Secret<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: Arc::new(api_key),
        }
    }

    /// Scans `channels` in order and returns the first one with a live video.
    /// Channels after the first hit are never queried.
    #[tracing::instrument(name = "Find active live stream", skip(self, channels), fields(channels = channels.len()))]
    pub async fn find_active_live(&self, channels: &[Channel]) -> Option<LiveStream> {
        for channel in channels {
            match self.search_live_video(&channel.channel_id).await {
                Ok(Some(video_id)) => {
                    info!("Channel {} is live with video {}", channel.channel_id, video_id);
                    return Some(LiveStream {
                        video_id,
                        channel_id: channel.channel_id.clone(),
                    });
                }
                Ok(None) => {
                    debug!("Channel {} has no live video", channel.channel_id);
                }
                Err(e) => {
                    warn!(
                        "Live search failed for channel {}, treating as offline: {}",
                        channel.channel_id, e
                    );
                }
            }
        }

        info!("No tracked channel is live");
        None
    }

    /// Actual (not scheduled) start of the broadcast, or `None` when it cannot
    /// be determined for any reason.
    #[tracing::instrument(name = "Get stream start", skip(self))]
    pub async fn get_stream_start(&self, video_id: &str) -> Option<DateTime<Utc>> {
        match self.fetch_actual_start_time(video_id).await {
            Ok(Some(raw)) => {
                let parsed = parse_start_time(&raw);
                if parsed.is_none() {
                    warn!("Unparsable actualStartTime for video {}: {}", video_id, raw);
                }
                parsed
            }
            Ok(None) => {
                info!("Video {} has no actualStartTime yet", video_id);
                None
            }
            Err(e) => {
                warn!("Stream start lookup failed for video {}: {}", video_id, e);
                None
            }
        }
    }

    async fn search_live_video(&self, channel_id: &str) -> Result<Option<String>, AppError> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("channelId", channel_id),
                ("eventType", "live"),
                ("type", "video"),
                ("key", self.api_key.expose_secret().as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(anyhow::anyhow!(
                "YouTube search error ({}): {}",
                status,
                error_text
            )));
        }

        let data: SearchListResponse = response.json().await?;

        Ok(data
            .items
            .into_iter()
            .find_map(|item| item.id.video_id.filter(|id| !id.is_empty())))
    }

    async fn fetch_actual_start_time(&self, video_id: &str) -> Result<Option<String>, AppError> {
        let url = format!("{}/videos", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("part", "liveStreamingDetails"),
                ("id", video_id),
                ("key", self.api_key.expose_secret().as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(anyhow::anyhow!(
                "YouTube videos error ({}): {}",
                status,
                error_text
            )));
        }

        let data: VideoListResponse = response.json().await?;

        Ok(data
            .items
            .into_iter()
            .next()
            .and_then(|item| item.live_streaming_details)
            .and_then(|details| details.actual_start_time))
    }
}

/// Parses YouTube's RFC 3339 timestamps (`2024-05-01T18:00:03Z`) into UTC.
pub fn parse_start_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
