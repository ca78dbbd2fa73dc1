use axum::{
    extract::{Json, State},
    response::IntoResponse,
};
use tracing::{info, instrument};

use bp_tracker_domain::entities::BPThreshold;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::entities::settings::{ProfileResponse, SettingsResponse, UpdateProfileRequest, UpdateSettingsRequest};

#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "The user profile", body = ProfileResponse),
    ),
    tag = "settings"
)]
#[instrument(skip(state))]
pub async fn get_profile(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let profile = state.settings.profile().await?;
    Ok(Json(ProfileResponse::from(profile)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Invalid profile", body = crate::entities::common::ErrorResponse),
    ),
    tag = "settings"
)]
#[instrument(skip(state, request))]
pub async fn update_profile(
    State(state): State<AppState>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.settings.update_profile(request.into()).await?;
    Ok(Json(ProfileResponse::from(profile)))
}

#[utoipa::path(
    get,
    path = "/api/v1/settings",
    responses(
        (status = 200, description = "Application settings", body = SettingsResponse),
    ),
    tag = "settings"
)]
#[instrument(skip(state))]
pub async fn get_settings(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let settings = state.settings.settings().await?;
    Ok(Json(SettingsResponse::from(settings)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = SettingsResponse),
        (status = 400, description = "Invalid settings", body = crate::entities::common::ErrorResponse),
    ),
    tag = "settings"
)]
#[instrument(skip(state, request))]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let settings = state.settings.update_settings(request.into()).await?;
    Ok(Json(SettingsResponse::from(settings)))
}

/// Threshold the classifier compares readings against
#[utoipa::path(
    get,
    path = "/api/v1/settings/threshold",
    responses(
        (status = 200, description = "Current threshold", body = BPThreshold),
    ),
    tag = "settings"
)]
#[instrument(skip(state))]
pub async fn get_threshold(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.settings.threshold().await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/settings/threshold",
    request_body = BPThreshold,
    responses(
        (status = 200, description = "Threshold replaced", body = BPThreshold),
        (status = 400, description = "Invalid threshold", body = crate::entities::common::ErrorResponse),
    ),
    tag = "settings"
)]
#[instrument(skip(state))]
pub async fn update_threshold(
    State(state): State<AppState>,
    Json(threshold): Json<BPThreshold>,
) -> Result<impl IntoResponse, ApiError> {
    let threshold = state.settings.update_threshold(threshold).await?;
    info!(
        "Threshold set to high {}/{} low {}/{}",
        threshold.high_systolic, threshold.high_diastolic, threshold.low_systolic, threshold.low_diastolic
    );
    Ok(Json(threshold))
}
