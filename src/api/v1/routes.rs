//! V1 API route definitions

use axum::{
    middleware,
    routing::{delete, get},
    Router,
};

use crate::api::common::middleware::admin_middleware;
use crate::api::v1::admin::{create_channel, delete_channel, list_channels};
use crate::api::v1::clips::{all_clips, create_clip};
use crate::InnerState;

/// Public clip routes
#[tracing::instrument(name = "create_v1_routes", skip(state))]
pub fn create_v1_routes(state: InnerState) -> Router<InnerState> {
    tracing::info!("Setting up V1 API routes");

    Router::new()
        .route("/clip", get(create_clip))
        .route("/api/clips", get(all_clips))
        .merge(create_admin_routes(state))
}

/// Admin routes, all behind the shared-secret check
fn create_admin_routes(state: InnerState) -> Router<InnerState> {
    Router::new()
        .route("/admin/channels", get(list_channels).post(create_channel))
        .route("/admin/channels/:id", delete(delete_channel))
        .route_layer(middleware::from_fn_with_state(state, admin_middleware))
}
