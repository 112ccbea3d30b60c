//! Clip pipeline
//!
//! Registry → live lookup → stream start → link → webhook → clip store.
//! Only a missing live stream, an unknown stream start and store failures
//! change the outcome; webhook delivery is best effort.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::clip::compose;
use crate::db::channels::all_channels;
use crate::db::clips::{insert_clip, Clip, NewClip};
use crate::errors::AppError;
use crate::notifier::format_clip_message;
use crate::InnerState;

pub const DEFAULT_USER: &str = "someone";

#[derive(Debug, Default, Clone)]
pub struct ClipRequest {
    pub user: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedClip {
    pub clip: Clip,
    pub offset_seconds: i64,
    pub notified: bool,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[tracing::instrument(name = "Create clip", skip(inner))]
pub async fn create_clip(
    inner: &InnerState,
    request: ClipRequest,
    now: DateTime<Utc>,
) -> Result<CreatedClip, AppError> {
    let user = non_blank(request.user).unwrap_or_else(|| DEFAULT_USER.to_string());
    let requested_title = non_blank(request.title);

    let channels = all_channels(&inner.db).await?;

    let live = inner
        .youtube
        .find_active_live(&channels)
        .await
        .ok_or_else(|| AppError::NotFound("No live stream found".to_string()))?;

    let stream_start = inner
        .youtube
        .get_stream_start(&live.video_id)
        .await
        .ok_or_else(|| AppError::StreamStart("Couldn't fetch stream start time".to_string()))?;

    let link = compose(
        &live.video_id,
        stream_start,
        now,
        inner.settings.clip_offset_seconds,
    );

    info!(
        "Clipping {} on channel {} at {}s",
        live.video_id, live.channel_id, link.offset_seconds
    );

    let message = format_clip_message(&user, requested_title.as_deref(), &link.clip_url);
    let notified = inner.notifier.notify(&message).await;

    let title = requested_title.unwrap_or_else(|| format!("Clip by {}", user));

    let clip = insert_clip(
        &inner.db,
        &NewClip {
            title,
            user,
            clip_url: link.clip_url,
            thumbnail_url: link.thumbnail_url,
            video_id: live.video_id,
            created_at: now,
        },
    )
    .await?;

    Ok(CreatedClip {
        clip,
        offset_seconds: link.offset_seconds,
        notified,
    })
}
