mod api;
mod clip;
mod config;
mod db;
mod errors;
mod notifier;
mod services;
mod system;
#[cfg(test)]
mod testing;
mod utils;
mod youtube;

use std::sync::Arc;

use anyhow::Context;
use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use secrecy::{ExposeSecret, Secret};
use sqlx::SqlitePool;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::Settings;
use crate::db::init_db;
use crate::notifier::WebhookNotifier;
use crate::utils::build_http_client;
use crate::youtube::YoutubeClient;

#[derive(Clone)]
pub struct InnerState {
    pub db: SqlitePool,
    pub youtube: YoutubeClient,
    pub notifier: WebhookNotifier,
    pub settings: Arc<Settings>,
}

impl InnerState {
    pub fn new(settings: Settings, db: SqlitePool) -> Result<Self, reqwest::Error> {
        let http_client = build_http_client(settings.http_timeout)?;

        let youtube = YoutubeClient::new(
            http_client.clone(),
            settings.youtube_api_base_url.clone(),
            Secret::new(settings.youtube_api_key.expose_secret().clone()),
        );
        let notifier = WebhookNotifier::new(http_client, settings.discord_webhook_url.clone());

        Ok(Self {
            db,
            youtube,
            notifier,
            settings: Arc::new(settings),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "live_clipper=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;

    if settings.admin_key.is_none() {
        tracing::warn!("ADMIN_KEY is not set, admin endpoints will reject every request");
    }
    if settings.discord_webhook_url.is_none() {
        tracing::warn!("DISCORD_WEBHOOK is not set, clips will not be announced");
    }

    let db = init_db(&settings).await?;
    let port = settings.port;

    let state = InnerState::new(settings, db).context("Failed to build HTTP client")?;

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let app = api::create_app(state)
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(prometheus_layer);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Could not bind to port {}", port))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
