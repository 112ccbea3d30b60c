//! System-level routes: liveness and health

pub mod health_check;

use axum::{routing::get, Router};

use crate::InnerState;

pub fn create_system_router() -> Router<InnerState> {
    Router::new()
        .route("/", get(health_check::root))
        .route("/ping", get(health_check::ping))
        .route("/health", get(health_check::health_check))
}
