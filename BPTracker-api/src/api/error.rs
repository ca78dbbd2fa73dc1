use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use bp_tracker_domain::ServiceError;

use crate::entities::common::ErrorResponse;

/// Error returned by every handler
#[derive(Debug)]
pub enum ApiError {
    Service(ServiceError),
    /// Request shape accepted by the extractor but still unusable
    BadRequest(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}

impl ApiError {
    fn status_and_body(self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, ErrorResponse::new("bad_request", message)),
            ApiError::Service(err) => {
                let message = err.user_message();
                match err {
                    ServiceError::Validation(report) => {
                        warn!("Rejected input: {}", report);
                        let details = report
                            .errors
                            .into_iter()
                            .map(|(field, message)| (field.as_str().to_string(), message))
                            .collect();
                        (
                            StatusCode::BAD_REQUEST,
                            ErrorResponse {
                                error: "validation_error".to_string(),
                                message,
                                details: Some(details),
                            },
                        )
                    }
                    ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorResponse::new("not_found", message)),
                    ServiceError::Permission(detail) => {
                        warn!("Permission denied: {}", detail);
                        (StatusCode::FORBIDDEN, ErrorResponse::new("permission_denied", message))
                    }
                    ServiceError::Storage(detail) => {
                        error!("Storage failure: {}", detail);
                        (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new("storage_error", message))
                    }
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_tracker_domain::services::{ValidationField, ValidationReport};

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                ServiceError::Validation(ValidationReport::single(ValidationField::Pulse, "Please enter pulse")),
                StatusCode::BAD_REQUEST,
            ),
            (ServiceError::NotFound("Record 3 not found".to_string()), StatusCode::NOT_FOUND),
            (ServiceError::Permission("notifications".to_string()), StatusCode::FORBIDDEN),
            (ServiceError::Storage("disk full".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), expected);
        }
    }

    #[test]
    fn test_storage_detail_is_not_exposed() {
        let (_, body) = ApiError::from(ServiceError::Storage("database is locked".to_string())).status_and_body();
        assert!(!body.message.contains("locked"));
        assert!(body.details.is_none());
    }

    #[test]
    fn test_validation_details() {
        let report = ValidationReport::single(ValidationField::General, "Systolic pressure must be greater than diastolic pressure");
        let (_, body) = ApiError::from(ServiceError::Validation(report)).status_and_body();
        let details = body.details.unwrap();
        assert_eq!(
            details.get("general").map(String::as_str),
            Some("Systolic pressure must be greater than diastolic pressure")
        );
    }
}
