//! Streamed download handler.

use crate::api::AppState;
use crate::api::error_response::rejection_to_error;
use crate::types::DownloadRequest;
use axum::{
    Json,
    body::Body,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::convert::Infallible;
use tokio_stream::StreamExt;

/// POST /download - Run a download and stream its progress
///
/// The body is newline-delimited JSON: zero or more `{"progress": <percent>}`
/// objects followed by exactly one terminal object, either
/// `{"progress": 100}` or `{"error": "<message>"}`. The status is 200 even
/// when the job fails; failures travel inside the stream.
#[utoipa::path(
    post,
    path = "/download",
    tag = "download",
    request_body = crate::types::DownloadRequest,
    responses(
        (status = 200, description = "Newline-delimited JSON progress events", content_type = "application/json"),
        (status = 400, description = "Request body is not valid JSON", body = crate::error::ApiError)
    )
)]
pub async fn download(
    State(state): State<AppState>,
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_to_error(rejection).into_response(),
    };

    let events = state
        .jobs
        .start(request)
        .map(|event| Ok::<_, Infallible>(event.to_ndjson()));

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Body::from_stream(events),
    )
        .into_response()
}
