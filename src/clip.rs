//! Turns a look-back offset into a concrete timestamped YouTube link.
//!
//! Everything here is pure: no I/O, no clock reads. The caller passes `now`.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

const WATCH_URL: &str = "https://www.youtube.com/watch";
const THUMBNAIL_BASE_URL: &str = "https://i.ytimg.com/vi";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipLink {
    pub offset_seconds: i64,
    pub clip_url: String,
    pub thumbnail_url: String,
}

/// Seconds into the broadcast that `now - requested_offset_seconds` falls on,
/// floored and clamped so a clip never points before the stream began.
pub fn offset_seconds(
    stream_start: DateTime<Utc>,
    now: DateTime<Utc>,
    requested_offset_seconds: u32,
) -> i64 {
    let candidate = now
        .checked_sub_signed(Duration::seconds(i64::from(requested_offset_seconds)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    // num_seconds truncates toward zero, which is a floor for the non-negative case
    candidate.signed_duration_since(stream_start).num_seconds().max(0)
}

pub fn watch_url(video_id: &str, offset_seconds: i64) -> String {
    format!("{}?v={}&t={}s", WATCH_URL, video_id, offset_seconds)
}

pub fn thumbnail_url(video_id: &str) -> String {
    format!("{}/{}/mqdefault.jpg", THUMBNAIL_BASE_URL, video_id)
}

pub fn compose(
    video_id: &str,
    stream_start: DateTime<Utc>,
    now: DateTime<Utc>,
    requested_offset_seconds: u32,
) -> ClipLink {
    let offset_seconds = offset_seconds(stream_start, now, requested_offset_seconds);

    ClipLink {
        offset_seconds,
        clip_url: watch_url(video_id, offset_seconds),
        thumbnail_url: thumbnail_url(video_id),
    }
}
