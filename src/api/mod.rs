//! HTTP surface: versioned API routes plus system routes, wrapped in the
//! shared CORS and tracing layers.

pub mod common;
pub mod v1;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::common::tracing::{
    make_custom_span, on_custom_failure, on_custom_request, on_custom_response,
};
use crate::system::create_system_router;
use crate::InnerState;

#[tracing::instrument(name = "create_app", skip(state))]
pub fn create_app(state: InnerState) -> Router {
    tracing::debug!("Creating application router");

    Router::new()
        .merge(create_system_router())
        .merge(v1::routes::create_v1_routes(state.clone()))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_custom_span)
                .on_request(on_custom_request)
                .on_response(on_custom_response)
                .on_failure(on_custom_failure),
        )
        .with_state(state)
}
