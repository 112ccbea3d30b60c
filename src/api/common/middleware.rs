use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use secrecy::{ExposeSecret, Secret};

use crate::errors::AppError;
use crate::InnerState;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Rejects admin requests unless `x-admin-key` matches the configured key.
/// With no key configured every request is refused.
pub async fn admin_middleware(
    State(inner): State<InnerState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = extract_admin_key(request.headers());
    check_admin_key(inner.settings.admin_key.as_ref(), presented)?;

    Ok(next.run(request).await)
}

fn extract_admin_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
}

pub fn check_admin_key(configured: Option<&Secret<String>>, presented: Option<&str>) -> Result<(), AppError> {
    let Some(configured) = configured else {
        tracing::error!("Admin request refused: ADMIN_KEY is not configured");
        return Err(AppError::NotConfigured(
            "Admin access is not configured".to_string(),
        ));
    };

    match presented {
        Some(key) if key == configured.expose_secret().as_str() => Ok(()),
        Some(_) => {
            tracing::info!("Admin request with mismatched key");
            Err(AppError::Authentication(anyhow::anyhow!("Invalid admin key")))
        }
        None => {
            tracing::info!("Admin request without {} header", ADMIN_KEY_HEADER);
            Err(AppError::Authentication(anyhow::anyhow!("Invalid admin key")))
        }
    }
}
