use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;

use bp_tracker_domain::ServiceError;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::entities::images::{ImageResponse, SaveImageRequest};

/// Copy a captured photo into the image store
#[utoipa::path(
    post,
    path = "/api/v1/images",
    request_body = SaveImageRequest,
    responses(
        (status = 201, description = "Image stored", body = ImageResponse),
        (status = 400, description = "Empty source path", body = crate::entities::common::ErrorResponse),
        (status = 403, description = "File access not permitted", body = crate::entities::common::ErrorResponse),
        (status = 404, description = "Source file missing", body = crate::entities::common::ErrorResponse),
        (status = 500, description = "Copy failed", body = crate::entities::common::ErrorResponse),
    ),
    tag = "images"
)]
#[instrument(skip(state))]
pub async fn save_image(
    State(state): State<AppState>,
    Json(request): Json<SaveImageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.source_path.trim().is_empty() {
        return Err(ApiError::BadRequest("source_path must not be empty".to_string()));
    }

    let path = state
        .images
        .save(&request.source_path)
        .await
        .map_err(ServiceError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(ImageResponse {
            path: path.to_string_lossy().into_owned(),
        }),
    ))
}
