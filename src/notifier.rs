use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;

/// Posts clip announcements to a Discord-style webhook.
///
/// Delivery is advisory. `notify` never fails the caller; an unconfigured
/// notifier is a no-op.
#[derive(Clone, Debug)]
pub struct WebhookNotifier {
    http_client: Client,
    webhook_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

impl WebhookNotifier {
    pub fn new(http_client: Client, webhook_url: Option<String>) -> Self {
        Self {
            http_client,
            webhook_url,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Single delivery attempt. Non-2xx responses count as failures.
    pub async fn send(&self, message: &str) -> Result<(), AppError> {
        let Some(url) = &self.webhook_url else {
            return Ok(());
        };

        let response = self
            .http_client
            .post(url)
            .json(&WebhookMessage { content: message })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(anyhow::anyhow!(
                "Webhook rejected message ({}): {}",
                status,
                error_text
            )));
        }

        Ok(())
    }

    #[tracing::instrument(name = "Notify webhook", skip(self, message), fields(configured = self.is_configured()))]
    pub async fn notify(&self, message: &str) -> bool {
        if !self.is_configured() {
            info!("No webhook configured, skipping notification");
            return true;
        }

        match self.send(message).await {
            Ok(()) => {
                info!("Webhook notification delivered");
                true
            }
            Err(e) => {
                warn!("Webhook notification failed: {}", e);
                false
            }
        }
    }
}

pub fn format_clip_message(user: &str, title: Option<&str>, clip_url: &str) -> String {
    match title {
        Some(title) => format!("🎬 New Clip by **{}** ({}): {}", user, title, clip_url),
        None => format!("🎬 New Clip by **{}**: {}", user, clip_url),
    }
}
