use thiserror::Error;
use tracing::error;

use bp_tracker_data::files::ImageStoreError;
use bp_tracker_data::repository::RepositoryError;

use crate::entities::conversions::ConversionError;
use crate::notifications::NotificationError;
use crate::services::validation::ValidationReport;

/// Errors surfaced by the domain services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input rejected, with one message per field
    #[error("Validation error: {0}")]
    Validation(ValidationReport),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The store failed. The detail is for logs, not for users.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Notification or file permission missing
    #[error("Permission denied: {0}")]
    Permission(String),
}

impl ServiceError {
    pub fn not_found(what: &str, id: i64) -> Self {
        ServiceError::NotFound(format!("{} {} not found", what, id))
    }

    /// Message safe to show to the user
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Validation(report) => report.to_string(),
            ServiceError::NotFound(msg) => msg.clone(),
            ServiceError::Storage(_) => "Could not save or load data. Please try again.".to_string(),
            ServiceError::Permission(_) => "Permission is required to continue. Please allow it in settings.".to_string(),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => ServiceError::NotFound(msg),
            other => {
                error!("Repository failure: {}", other);
                ServiceError::Storage(other.to_string())
            }
        }
    }
}

impl From<ConversionError> for ServiceError {
    fn from(err: ConversionError) -> Self {
        error!("Stored data could not be read: {}", err);
        ServiceError::Storage(err.to_string())
    }
}

impl From<NotificationError> for ServiceError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::PermissionDenied => ServiceError::Permission(err.to_string()),
            NotificationError::Failed(msg) => ServiceError::Storage(msg),
        }
    }
}

impl From<ImageStoreError> for ServiceError {
    fn from(err: ImageStoreError) -> Self {
        match err {
            ImageStoreError::PermissionDenied(msg) => ServiceError::Permission(msg),
            ImageStoreError::NotFound(msg) => ServiceError::NotFound(msg),
            ImageStoreError::Io(io) => {
                error!("Image store failure: {}", io);
                ServiceError::Storage(io.to_string())
            }
        }
    }
}

impl From<ValidationReport> for ServiceError {
    fn from(report: ValidationReport) -> Self {
        ServiceError::Validation(report)
    }
}
