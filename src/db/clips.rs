//! Clip store: append-only log of created clips.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::errors::AppError;
use crate::utils::{timeout_query, DB_QUERY_TIMEOUT};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub id: i64,
    pub title: String,
    pub user: String,
    pub clip_url: String,
    pub thumbnail_url: String,
    pub video_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewClip {
    pub title: String,
    pub user: String,
    pub clip_url: String,
    pub thumbnail_url: String,
    pub video_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipPage {
    pub items: Vec<Clip>,
    pub page: i64,
    pub limit: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

const SELECT_CLIP_COLUMNS: &str =
    r#"SELECT id, title, "user", clip_url, thumbnail_url, video_id, timestamp AS created_at FROM clips"#;

// Newest first; id breaks ties between identical timestamps
const ORDER_NEWEST_FIRST: &str = "ORDER BY timestamp DESC, id DESC";

const SEARCH_FILTER: &str =
    r#"WHERE title_folded LIKE ? ESCAPE '\' OR user_folded LIKE ? ESCAPE '\'"#;

#[tracing::instrument(name = "Insert clip", skip(db))]
pub async fn insert_clip(db: &SqlitePool, clip: &NewClip) -> Result<Clip, AppError> {
    let stored = timeout_query(
        DB_QUERY_TIMEOUT,
        sqlx::query_as::<_, Clip>(
            r#"INSERT INTO clips (title, "user", clip_url, thumbnail_url, video_id, timestamp, title_folded, user_folded)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)
               RETURNING id, title, "user", clip_url, thumbnail_url, video_id, timestamp AS created_at"#,
        )
        .bind(&clip.title)
        .bind(&clip.user)
        .bind(&clip.clip_url)
        .bind(&clip.thumbnail_url)
        .bind(&clip.video_id)
        .bind(clip.created_at)
        .bind(clip.title.to_lowercase())
        .bind(clip.user.to_lowercase())
        .fetch_one(db),
    )
    .await?;

    tracing::info!("Stored clip {} for video {}", stored.id, stored.video_id);
    Ok(stored)
}

/// One page of clips, newest first. A non-blank `search` keeps clips whose
/// title or user contains it, ignoring case.
#[tracing::instrument(name = "List clips", skip(db))]
pub async fn list_clips(
    db: &SqlitePool,
    page: i64,
    limit: i64,
    search: Option<&str>,
) -> Result<ClipPage, AppError> {
    let page = page.max(1);
    let limit = limit.max(1);
    let offset = (page - 1).saturating_mul(limit);

    let pattern = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", escape_like(&s.to_lowercase())));

    let (items, total_items) = match &pattern {
        Some(pattern) => {
            let items_sql = format!("{} {} {} LIMIT ? OFFSET ?", SELECT_CLIP_COLUMNS, SEARCH_FILTER, ORDER_NEWEST_FIRST);
            let count_sql = format!("SELECT COUNT(*) FROM clips {}", SEARCH_FILTER);

            let items = timeout_query(
                DB_QUERY_TIMEOUT,
                sqlx::query_as::<_, Clip>(&items_sql)
                    .bind(pattern)
                    .bind(pattern)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(db),
            )
            .await?;

            let total = timeout_query(
                DB_QUERY_TIMEOUT,
                sqlx::query_scalar::<_, i64>(&count_sql)
                    .bind(pattern)
                    .bind(pattern)
                    .fetch_one(db),
            )
            .await?;

            (items, total)
        }
        None => {
            let items_sql = format!("{} {} LIMIT ? OFFSET ?", SELECT_CLIP_COLUMNS, ORDER_NEWEST_FIRST);

            let items = timeout_query(
                DB_QUERY_TIMEOUT,
                sqlx::query_as::<_, Clip>(&items_sql)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(db),
            )
            .await?;

            let total = timeout_query(
                DB_QUERY_TIMEOUT,
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clips").fetch_one(db),
            )
            .await?;

            (items, total)
        }
    };

    tracing::debug!(
        "list_clips: page {} limit {} returned {} of {} clips",
        page,
        limit,
        items.len(),
        total_items
    );

    Ok(ClipPage {
        items,
        page,
        limit,
        total_items,
        total_pages: total_pages(total_items, limit),
    })
}

/// `ceil(total / limit)`, never less than 1.
pub fn total_pages(total_items: i64, limit: i64) -> i64 {
    let limit = limit.max(1);
    let pages = total_items / limit + i64::from(total_items % limit != 0);
    pages.max(1)
}

/// Escapes LIKE wildcards so the term matches literally (with `ESCAPE '\'`).
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
