use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, instrument, warn};

use bp_tracker_domain::entities::{BPRecord, RecordFilter};
use bp_tracker_domain::services::classification::{
    classify, classify_record, format_reading, is_abnormal, mean_arterial_pressure, pulse_pressure, should_alert,
};
use bp_tracker_domain::services::validation;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::entities::records::{
    ChartPoint, ClassifyQuery, ClassifyResponse, CreateRecordRequest, RecordListQuery, RecordResponse,
    StatisticsResponse, StatusResponse, UpdateRecordRequest, ValidateRequest, ValidateResponse,
};

fn filter_from(query: &RecordListQuery) -> Result<RecordFilter, ApiError> {
    query
        .to_filter()
        .ok_or_else(|| ApiError::BadRequest("start_date and end_date must be given together".to_string()))
}

/// Attach the status of each record against the stored threshold
async fn with_status(state: &AppState, records: Vec<BPRecord>) -> Result<Vec<RecordResponse>, ApiError> {
    let threshold = state.settings.threshold().await?;
    Ok(records
        .into_iter()
        .map(|record| {
            let status = classify_record(&record, &threshold);
            RecordResponse::from_domain(record, status)
        })
        .collect())
}

async fn one_with_status(state: &AppState, record: BPRecord) -> Result<RecordResponse, ApiError> {
    let threshold = state.settings.threshold().await?;
    let status = classify_record(&record, &threshold);
    Ok(RecordResponse::from_domain(record, status))
}

/// List records, newest first
#[utoipa::path(
    get,
    path = "/api/v1/records",
    params(RecordListQuery),
    responses(
        (status = 200, description = "Records matching the filter", body = [RecordResponse]),
        (status = 400, description = "Invalid filter", body = crate::entities::common::ErrorResponse),
        (status = 500, description = "Storage error", body = crate::entities::common::ErrorResponse),
    ),
    tag = "records"
)]
#[instrument(skip(state))]
pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<RecordListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = filter_from(&query)?;
    let records = state.records.list(&filter).await?;
    Ok(Json(with_status(&state, records).await?))
}

/// Save a new reading
#[utoipa::path(
    post,
    path = "/api/v1/records",
    request_body = CreateRecordRequest,
    responses(
        (status = 201, description = "Record created", body = RecordResponse),
        (status = 400, description = "Invalid reading", body = crate::entities::common::ErrorResponse),
        (status = 500, description = "Storage error", body = crate::entities::common::ErrorResponse),
    ),
    tag = "records"
)]
#[instrument(skip(state, request))]
pub async fn create_record(
    State(state): State<AppState>,
    Json(request): Json<CreateRecordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state.records.create(request.into()).await?;
    info!("Record {} created", record.id);
    Ok((StatusCode::CREATED, Json(one_with_status(&state, record).await?)))
}

/// Most recent record, `null` when there is none
#[utoipa::path(
    get,
    path = "/api/v1/records/latest",
    responses(
        (status = 200, description = "Latest record, or null when nothing is stored", body = RecordResponse),
    ),
    tag = "records"
)]
#[instrument(skip(state))]
pub async fn get_latest_record(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let latest = match state.records.latest_or_none().await {
        Some(record) => Some(one_with_status(&state, record).await?),
        None => None,
    };
    Ok(Json(latest))
}

/// Aggregates over the filtered records
#[utoipa::path(
    get,
    path = "/api/v1/records/statistics",
    params(RecordListQuery),
    responses(
        (status = 200, description = "Statistics", body = StatisticsResponse),
        (status = 400, description = "Invalid filter", body = crate::entities::common::ErrorResponse),
    ),
    tag = "records"
)]
#[instrument(skip(state))]
pub async fn get_statistics(
    State(state): State<AppState>,
    Query(query): Query<RecordListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = filter_from(&query)?;
    let stats = state.records.statistics(&filter).await?;
    Ok(Json(StatisticsResponse::from(stats)))
}

/// Chart points, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/records/chart",
    params(RecordListQuery),
    responses(
        (status = 200, description = "Chart points", body = [ChartPoint]),
        (status = 400, description = "Invalid filter", body = crate::entities::common::ErrorResponse),
    ),
    tag = "records"
)]
#[instrument(skip(state))]
pub async fn get_chart_data(
    State(state): State<AppState>,
    Query(query): Query<RecordListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = filter_from(&query)?;
    let points: Vec<ChartPoint> = state
        .records
        .chart_data(&filter)
        .await?
        .into_iter()
        .map(ChartPoint::from)
        .collect();
    Ok(Json(points))
}

#[utoipa::path(
    get,
    path = "/api/v1/records/{id}",
    params(("id" = i64, Path, description = "Record id")),
    responses(
        (status = 200, description = "Record found", body = RecordResponse),
        (status = 404, description = "Record not found", body = crate::entities::common::ErrorResponse),
    ),
    tag = "records"
)]
#[instrument(skip(state))]
pub async fn get_record(State(state): State<AppState>, Path(id): Path<i64>) -> Result<impl IntoResponse, ApiError> {
    let record = state.records.get(id).await?;
    Ok(Json(one_with_status(&state, record).await?))
}

/// Partial update; a changed value revalidates the whole reading
#[utoipa::path(
    patch,
    path = "/api/v1/records/{id}",
    params(("id" = i64, Path, description = "Record id")),
    request_body = UpdateRecordRequest,
    responses(
        (status = 200, description = "Record updated", body = RecordResponse),
        (status = 400, description = "Invalid reading", body = crate::entities::common::ErrorResponse),
        (status = 404, description = "Record not found", body = crate::entities::common::ErrorResponse),
    ),
    tag = "records"
)]
#[instrument(skip(state, request))]
pub async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateRecordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state.records.update(id, request.into()).await?;
    Ok(Json(one_with_status(&state, record).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/records/{id}",
    params(("id" = i64, Path, description = "Record id")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Record not found", body = crate::entities::common::ErrorResponse),
    ),
    tag = "records"
)]
#[instrument(skip(state))]
pub async fn delete_record(State(state): State<AppState>, Path(id): Path<i64>) -> Result<impl IntoResponse, ApiError> {
    let record = state.records.get(id).await?;
    state.records.delete(id).await?;

    // A photo that cannot be removed does not fail the delete
    if let Some(image_path) = record.image_path {
        if let Err(e) = state.images.delete(&image_path).await {
            warn!("Could not delete image {} of record {}: {}", image_path, id, e);
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Status band of a stored record
#[utoipa::path(
    get,
    path = "/api/v1/records/{id}/status",
    params(("id" = i64, Path, description = "Record id")),
    responses(
        (status = 200, description = "Status of the record", body = StatusResponse),
        (status = 404, description = "Record not found", body = crate::entities::common::ErrorResponse),
    ),
    tag = "records"
)]
#[instrument(skip(state))]
pub async fn get_record_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state.records.get(id).await?;
    let info = state.records.classify_record(&record).await?;
    Ok(Json(StatusResponse::from(info)))
}

/// Classify a reading without saving it
#[utoipa::path(
    get,
    path = "/api/v1/classify",
    params(ClassifyQuery),
    responses(
        (status = 200, description = "Status of the reading", body = ClassifyResponse),
    ),
    tag = "records"
)]
#[instrument(skip(state))]
pub async fn classify_reading(
    State(state): State<AppState>,
    Query(query): Query<ClassifyQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let threshold = state.settings.threshold().await?;
    let status = classify(query.systolic, query.diastolic, &threshold);

    Ok(Json(ClassifyResponse {
        reading: format_reading(query.systolic, query.diastolic),
        status: StatusResponse::from(status.info()),
        should_alert: should_alert(status),
        is_abnormal: is_abnormal(status),
        mean_arterial_pressure: mean_arterial_pressure(query.systolic, query.diastolic),
        pulse_pressure: pulse_pressure(query.systolic, query.diastolic),
    }))
}

/// Check form input as typed. Always 200; the body says whether it is valid.
#[utoipa::path(
    post,
    path = "/api/v1/validate",
    request_body = ValidateRequest,
    responses(
        (status = 200, description = "Validation outcome", body = ValidateResponse),
    ),
    tag = "records"
)]
#[instrument(skip(request))]
pub async fn validate_reading(Json(request): Json<ValidateRequest>) -> impl IntoResponse {
    let report = validation::validate(&request.systolic, &request.diastolic, &request.pulse);
    Json(ValidateResponse::from(report))
}
