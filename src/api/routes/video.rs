//! Metadata lookup handler.

use crate::api::AppState;
use crate::api::error_response::rejection_to_error;
use crate::metadata;
use crate::types::VideoInfoRequest;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// POST /video-info - Fetch normalized metadata for a video URL
#[utoipa::path(
    post,
    path = "/video-info",
    tag = "video",
    request_body = crate::types::VideoInfoRequest,
    responses(
        (status = 200, description = "Video metadata", body = crate::types::VideoInfo),
        (status = 400, description = "Missing URL or extraction failed", body = crate::error::ApiError)
    )
)]
pub async fn video_info(
    State(state): State<AppState>,
    payload: Result<Json<VideoInfoRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_to_error(rejection).into_response(),
    };

    match metadata::resolve(state.extractor.as_ref(), request.url()).await {
        Ok(info) => (StatusCode::OK, Json(info)).into_response(),
        Err(e) => {
            tracing::warn!(url = request.url(), error = %e, "metadata lookup failed");
            e.into_response()
        }
    }
}
