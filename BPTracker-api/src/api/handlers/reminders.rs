use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, instrument};

use bp_tracker_domain::entities::ReminderKind;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::entities::reminders::{
    CreateReminderRequest, ReminderResponse, ToggleReminderRequest, UpdateReminderRequest,
};

/// Reminders of one kind, ordered by time of day
#[utoipa::path(
    get,
    path = "/api/v1/reminders/{kind}",
    params(("kind" = String, Path, description = "`medication` or `measurement`")),
    responses(
        (status = 200, description = "Reminders of the kind", body = [ReminderResponse]),
    ),
    tag = "reminders"
)]
#[instrument(skip(state))]
pub async fn list_reminders(
    State(state): State<AppState>,
    Path(kind): Path<ReminderKind>,
) -> Result<impl IntoResponse, ApiError> {
    let reminders: Vec<ReminderResponse> = state
        .reminders
        .list(kind)
        .await?
        .into_iter()
        .map(ReminderResponse::from)
        .collect();
    Ok(Json(reminders))
}

#[utoipa::path(
    get,
    path = "/api/v1/reminders/{kind}/enabled",
    params(("kind" = String, Path, description = "`medication` or `measurement`")),
    responses(
        (status = 200, description = "Enabled reminders of the kind", body = [ReminderResponse]),
    ),
    tag = "reminders"
)]
#[instrument(skip(state))]
pub async fn list_enabled_reminders(
    State(state): State<AppState>,
    Path(kind): Path<ReminderKind>,
) -> Result<impl IntoResponse, ApiError> {
    let reminders: Vec<ReminderResponse> = state
        .reminders
        .list_enabled(kind)
        .await?
        .into_iter()
        .map(ReminderResponse::from)
        .collect();
    Ok(Json(reminders))
}

/// Store a reminder and schedule it when enabled
#[utoipa::path(
    post,
    path = "/api/v1/reminders/{kind}",
    params(("kind" = String, Path, description = "`medication` or `measurement`")),
    request_body = CreateReminderRequest,
    responses(
        (status = 201, description = "Reminder created", body = ReminderResponse),
        (status = 400, description = "Invalid reminder", body = crate::entities::common::ErrorResponse),
        (status = 403, description = "Notifications not permitted; the reminder is kept unscheduled", body = crate::entities::common::ErrorResponse),
    ),
    tag = "reminders"
)]
#[instrument(skip(state, request))]
pub async fn create_reminder(
    State(state): State<AppState>,
    Path(kind): Path<ReminderKind>,
    Json(request): Json<CreateReminderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let reminder = state.reminders.add(kind, request.into()).await?;
    info!("{} reminder {} created", kind, reminder.id);
    Ok((StatusCode::CREATED, Json(ReminderResponse::from(reminder))))
}

#[utoipa::path(
    get,
    path = "/api/v1/reminders/{kind}/{id}",
    params(
        ("kind" = String, Path, description = "`medication` or `measurement`"),
        ("id" = i64, Path, description = "Reminder id"),
    ),
    responses(
        (status = 200, description = "Reminder found", body = ReminderResponse),
        (status = 404, description = "Reminder not found", body = crate::entities::common::ErrorResponse),
    ),
    tag = "reminders"
)]
#[instrument(skip(state))]
pub async fn get_reminder(
    State(state): State<AppState>,
    Path((kind, id)): Path<(ReminderKind, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let reminder = state.reminders.get(kind, id).await?;
    Ok(Json(ReminderResponse::from(reminder)))
}

/// Partial update; schedule changes replace the pending notification
#[utoipa::path(
    patch,
    path = "/api/v1/reminders/{kind}/{id}",
    params(
        ("kind" = String, Path, description = "`medication` or `measurement`"),
        ("id" = i64, Path, description = "Reminder id"),
    ),
    request_body = UpdateReminderRequest,
    responses(
        (status = 200, description = "Reminder updated", body = ReminderResponse),
        (status = 400, description = "Invalid reminder", body = crate::entities::common::ErrorResponse),
        (status = 403, description = "Notifications not permitted", body = crate::entities::common::ErrorResponse),
        (status = 404, description = "Reminder not found", body = crate::entities::common::ErrorResponse),
    ),
    tag = "reminders"
)]
#[instrument(skip(state, request))]
pub async fn update_reminder(
    State(state): State<AppState>,
    Path((kind, id)): Path<(ReminderKind, i64)>,
    Json(request): Json<UpdateReminderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let reminder = state.reminders.edit(kind, id, request.into()).await?;
    Ok(Json(ReminderResponse::from(reminder)))
}

#[utoipa::path(
    post,
    path = "/api/v1/reminders/{kind}/{id}/toggle",
    params(
        ("kind" = String, Path, description = "`medication` or `measurement`"),
        ("id" = i64, Path, description = "Reminder id"),
    ),
    request_body = ToggleReminderRequest,
    responses(
        (status = 200, description = "Reminder toggled", body = ReminderResponse),
        (status = 403, description = "Notifications not permitted", body = crate::entities::common::ErrorResponse),
        (status = 404, description = "Reminder not found", body = crate::entities::common::ErrorResponse),
    ),
    tag = "reminders"
)]
#[instrument(skip(state))]
pub async fn toggle_reminder(
    State(state): State<AppState>,
    Path((kind, id)): Path<(ReminderKind, i64)>,
    Json(request): Json<ToggleReminderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let reminder = state.reminders.toggle(kind, id, request.enabled).await?;
    Ok(Json(ReminderResponse::from(reminder)))
}

/// Cancel the notification and delete the reminder
#[utoipa::path(
    delete,
    path = "/api/v1/reminders/{kind}/{id}",
    params(
        ("kind" = String, Path, description = "`medication` or `measurement`"),
        ("id" = i64, Path, description = "Reminder id"),
    ),
    responses(
        (status = 204, description = "Reminder deleted"),
        (status = 404, description = "Reminder not found", body = crate::entities::common::ErrorResponse),
    ),
    tag = "reminders"
)]
#[instrument(skip(state))]
pub async fn delete_reminder(
    State(state): State<AppState>,
    Path((kind, id)): Path<(ReminderKind, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    state.reminders.remove(kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
