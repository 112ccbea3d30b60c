use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::api::common::{ApiResponse, PaginationParams};
use crate::db::clips::{list_clips, ClipPage};
use crate::errors::AppError;
use crate::services::clipper::{self, ClipRequest, CreatedClip};
use crate::InnerState;

/// `name` and `title` both carry the clip title; `name` wins when both are sent.
#[derive(Debug, Default, Deserialize)]
pub struct ClipParams {
    pub user: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
}

impl ClipParams {
    pub fn into_request(self) -> ClipRequest {
        ClipRequest {
            user: self.user,
            title: self.name.or(self.title),
        }
    }
}

#[tracing::instrument(name = "Create clip from trigger", skip(inner))]
pub async fn create_clip(
    State(inner): State<InnerState>,
    Query(params): Query<ClipParams>,
) -> Result<Json<ApiResponse<CreatedClip>>, AppError> {
    let created = clipper::create_clip(&inner, params.into_request(), Utc::now()).await?;

    tracing::info!(
        "Clip {} created: {}",
        created.clip.id,
        created.clip.clip_url
    );

    Ok(Json(ApiResponse::success(created).with_message("Clip created")))
}

#[tracing::instrument(name = "List clips", skip(inner))]
pub async fn all_clips(
    State(inner): State<InnerState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ClipPage>, AppError> {
    let page = list_clips(&inner.db, params.page(), params.limit(), params.search()).await?;

    Ok(Json(page))
}
