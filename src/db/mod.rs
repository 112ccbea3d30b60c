pub mod channels;
pub mod clips;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::config::Settings;

const CREATE_CHANNELS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS channels (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        channel_id TEXT NOT NULL UNIQUE,
        name TEXT
    )
"#;

// `level` is reserved and never written. The `*_folded` columns hold Unicode
// lowercase copies for search; SQLite's LOWER() only folds ASCII.
const CREATE_CLIPS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS clips (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        "user" TEXT NOT NULL,
        clip_url TEXT NOT NULL,
        thumbnail_url TEXT NOT NULL,
        video_id TEXT NOT NULL,
        timestamp TEXT NOT NULL,
        level INTEGER,
        title_folded TEXT NOT NULL,
        user_folded TEXT NOT NULL
    )
"#;

const CREATE_CLIPS_TIMESTAMP_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_clips_timestamp ON clips (timestamp DESC, id DESC)";

pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    // Every connection to `sqlite::memory:` opens its own database
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

pub async fn create_schema(db: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in [
        CREATE_CHANNELS_TABLE,
        CREATE_CLIPS_TABLE,
        CREATE_CLIPS_TIMESTAMP_INDEX,
    ] {
        sqlx::query(statement).execute(db).await?;
    }
    Ok(())
}

#[tracing::instrument(name = "Initialize database", skip(settings))]
pub async fn init_db(settings: &Settings) -> Result<SqlitePool> {
    let db = connect(&settings.database_url)
        .await
        .context("Failed to connect to the database")?;

    create_schema(&db)
        .await
        .context("Failed to create database schema")?;

    if let Some(channel_id) = &settings.default_channel_id {
        let seeded = channels::seed_default_channel(
            &db,
            channel_id,
            settings.default_channel_name.as_deref(),
        )
        .await
        .context("Failed to seed default channel")?;

        if seeded {
            tracing::info!("Seeded empty channel registry with {}", channel_id);
        }
    }

    Ok(db)
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let db = connect("sqlite::memory:").await.unwrap();
    create_schema(&db).await.unwrap();
    db
}
