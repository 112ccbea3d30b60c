//! Admin channel management. Guarded by `admin_middleware`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::common::ApiResponse;
use crate::db::channels::{self, Channel};
use crate::errors::AppError;
use crate::InnerState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChannelRequest {
    pub channel_id: String,
    pub name: Option<String>,
}

#[tracing::instrument(name = "Admin list channels", skip(inner))]
pub async fn list_channels(
    State(inner): State<InnerState>,
) -> Result<Json<ApiResponse<Vec<Channel>>>, AppError> {
    let all = channels::all_channels(&inner.db).await?;

    Ok(Json(ApiResponse::success(all)))
}

#[tracing::instrument(name = "Admin create channel", skip(inner))]
pub async fn create_channel(
    State(inner): State<InnerState>,
    Json(payload): Json<CreateChannelRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Channel>>), AppError> {
    let channel_id = payload.channel_id.trim();
    if channel_id.is_empty() {
        return Err(AppError::Validation("channelId must not be empty".to_string()));
    }

    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    let channel = channels::create_channel(&inner.db, channel_id, name).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(channel).with_message("Channel added")),
    ))
}

#[tracing::instrument(name = "Admin delete channel", skip(inner))]
pub async fn delete_channel(
    State(inner): State<InnerState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<i64>>, AppError> {
    channels::delete_channel(&inner.db, id).await?;

    Ok(Json(ApiResponse::success(id).with_message("Channel removed")))
}

#[cfg(test)]
mod tests {
    use crate::api::common::middleware::ADMIN_KEY_HEADER;
    use crate::api::create_app;
    use crate::db::channels::{all_channels, create_channel};
    use crate::testing::{test_state, TestStateOptions};
    use crate::InnerState;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn admin_state() -> InnerState {
        test_state(TestStateOptions {
            admin_key: Some("s3cret".to_string()),
            ..Default::default()
        })
        .await
    }

    async fn send(
        state: &InnerState,
        method: Method,
        uri: &str,
        key: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = key {
            builder = builder.header(ADMIN_KEY_HEADER, key);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = create_app(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn create_list_and_delete_channels() {
        let state = admin_state().await;

        let (status, created) = send(
            &state,
            Method::POST,
            "/admin/channels",
            Some("s3cret"),
            Some(serde_json::json!({ "channelId": "UCnew", "name": "New one" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["data"]["channelId"], "UCnew");
        assert_eq!(created["data"]["name"], "New one");
        let id = created["data"]["id"].as_i64().unwrap();

        let (status, listed) = send(&state, Method::GET, "/admin/channels", Some("s3cret"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed["data"].as_array().unwrap().len(), 1);

        let (status, _) = send(
            &state,
            Method::DELETE,
            &format!("/admin/channels/{}", id),
            Some("s3cret"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(all_channels(&state.db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_channel_is_conflict() {
        let state = admin_state().await;
        create_channel(&state.db, "UCdup", Some("Original")).await.unwrap();

        let (status, body) = send(
            &state,
            Method::POST,
            "/admin/channels",
            Some("s3cret"),
            Some(serde_json::json!({ "channelId": "UCdup" })),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], 409);

        let all = all_channels(&state.db).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name.as_deref(), Some("Original"));
    }

    #[tokio::test]
    async fn blank_channel_id_is_rejected() {
        let state = admin_state().await;

        let (status, _) = send(
            &state,
            Method::POST,
            "/admin/channels",
            Some("s3cret"),
            Some(serde_json::json!({ "channelId": "  " })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(all_channels(&state.db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_unknown_channel_is_404() {
        let state = admin_state().await;

        let (status, _) = send(&state, Method::DELETE, "/admin/channels/77", Some("s3cret"), None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn wrong_or_missing_key_is_unauthorized() {
        let state = admin_state().await;
        create_channel(&state.db, "UCkeep", None).await.unwrap();

        for key in [None, Some("wrong")] {
            let (status, body) = send(&state, Method::GET, "/admin/channels", key, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body["message"], "Invalid admin key");

            let (status, _) = send(
                &state,
                Method::POST,
                "/admin/channels",
                key,
                Some(serde_json::json!({ "channelId": "UCsneaky" })),
            )
            .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);

            let (status, _) = send(&state, Method::DELETE, "/admin/channels/1", key, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }

        let all = all_channels(&state.db).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].channel_id, "UCkeep");
    }

    #[tokio::test]
    async fn unconfigured_admin_key_rejects_everything() {
        let state = test_state(TestStateOptions::default()).await;

        for key in [None, Some(""), Some("anything")] {
            let (status, body) = send(&state, Method::GET, "/admin/channels", key, None).await;
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(body["message"], "Admin access is not configured");
        }

        let (status, _) = send(
            &state,
            Method::POST,
            "/admin/channels",
            Some("anything"),
            Some(serde_json::json!({ "channelId": "UCx" })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(all_channels(&state.db).await.unwrap().is_empty());
    }
}
