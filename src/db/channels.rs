//! Channel registry: the tracked YouTube channels, in insertion order.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::errors::AppError;
use crate::utils::{timeout_query, DB_QUERY_TIMEOUT};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: i64,
    pub channel_id: String,
    pub name: Option<String>,
}

pub async fn all_channels(db: &SqlitePool) -> Result<Vec<Channel>, AppError> {
    timeout_query(
        DB_QUERY_TIMEOUT,
        sqlx::query_as::<_, Channel>("SELECT id, channel_id, name FROM channels ORDER BY id")
            .fetch_all(db),
    )
    .await
}

/// Inserts a channel. A duplicate `channel_id` is a `Conflict` and leaves the
/// registry untouched.
#[tracing::instrument(name = "Create channel", skip(db))]
pub async fn create_channel(
    db: &SqlitePool,
    channel_id: &str,
    name: Option<&str>,
) -> Result<Channel, AppError> {
    let mut tx = timeout_query(DB_QUERY_TIMEOUT, db.begin()).await?;

    let existing = timeout_query(
        DB_QUERY_TIMEOUT,
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM channels WHERE channel_id = ?")
            .bind(channel_id)
            .fetch_one(&mut *tx),
    )
    .await?;

    if existing > 0 {
        tracing::info!("Channel {} already registered", channel_id);
        return Err(AppError::Conflict(format!(
            "Channel '{}' is already registered",
            channel_id
        )));
    }

    let channel = timeout_query(
        DB_QUERY_TIMEOUT,
        sqlx::query_as::<_, Channel>(
            "INSERT INTO channels (channel_id, name) VALUES (?, ?) RETURNING id, channel_id, name",
        )
        .bind(channel_id)
        .bind(name)
        .fetch_one(&mut *tx),
    )
    .await?;

    timeout_query(DB_QUERY_TIMEOUT, tx.commit()).await?;

    tracing::info!("Registered channel {} with id {}", channel.channel_id, channel.id);
    Ok(channel)
}

#[tracing::instrument(name = "Delete channel", skip(db))]
pub async fn delete_channel(db: &SqlitePool, id: i64) -> Result<(), AppError> {
    let result = timeout_query(
        DB_QUERY_TIMEOUT,
        sqlx::query("DELETE FROM channels WHERE id = ?").bind(id).execute(db),
    )
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Channel {} not found", id)));
    }

    tracing::info!("Deleted channel {}", id);
    Ok(())
}

/// Inserts the default channel only when the registry is empty. Returns whether
/// a row was written.
pub async fn seed_default_channel(
    db: &SqlitePool,
    channel_id: &str,
    name: Option<&str>,
) -> Result<bool, AppError> {
    let result = timeout_query(
        DB_QUERY_TIMEOUT,
        sqlx::query(
            "INSERT INTO channels (channel_id, name) SELECT ?, ? WHERE NOT EXISTS (SELECT 1 FROM channels)",
        )
        .bind(channel_id)
        .bind(name)
        .execute(db),
    )
    .await?;

    Ok(result.rows_affected() > 0)
}
