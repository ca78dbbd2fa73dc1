use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A captured photo to keep
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaveImageRequest {
    /// Temporary path produced by the camera or picker
    pub source_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImageResponse {
    /// Permanent path to store in a record's `image_path`
    pub path: String,
}
