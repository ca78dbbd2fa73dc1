use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::health::health_check,

        // Records and ad hoc readings
        crate::api::handlers::records::list_records,
        crate::api::handlers::records::create_record,
        crate::api::handlers::records::get_latest_record,
        crate::api::handlers::records::get_statistics,
        crate::api::handlers::records::get_chart_data,
        crate::api::handlers::records::get_record,
        crate::api::handlers::records::update_record,
        crate::api::handlers::records::delete_record,
        crate::api::handlers::records::get_record_status,
        crate::api::handlers::records::classify_reading,
        crate::api::handlers::records::validate_reading,

        // Reminders
        crate::api::handlers::reminders::list_reminders,
        crate::api::handlers::reminders::list_enabled_reminders,
        crate::api::handlers::reminders::create_reminder,
        crate::api::handlers::reminders::get_reminder,
        crate::api::handlers::reminders::update_reminder,
        crate::api::handlers::reminders::toggle_reminder,
        crate::api::handlers::reminders::delete_reminder,

        // Profile and settings
        crate::api::handlers::settings::get_profile,
        crate::api::handlers::settings::update_profile,
        crate::api::handlers::settings::get_settings,
        crate::api::handlers::settings::update_settings,
        crate::api::handlers::settings::get_threshold,
        crate::api::handlers::settings::update_threshold,

        crate::api::handlers::images::save_image,
    ),
    components(
        schemas(
            crate::entities::common::ErrorResponse,

            crate::entities::records::RecordResponse,
            crate::entities::records::CreateRecordRequest,
            crate::entities::records::UpdateRecordRequest,
            crate::entities::records::StatisticsResponse,
            crate::entities::records::ChartPoint,
            crate::entities::records::StatusResponse,
            crate::entities::records::ClassifyResponse,
            crate::entities::records::ValidateRequest,
            crate::entities::records::ValidateResponse,

            crate::entities::reminders::ReminderResponse,
            crate::entities::reminders::CreateReminderRequest,
            crate::entities::reminders::UpdateReminderRequest,
            crate::entities::reminders::ToggleReminderRequest,

            crate::entities::settings::ProfileResponse,
            crate::entities::settings::UpdateProfileRequest,
            crate::entities::settings::SettingsResponse,
            crate::entities::settings::UpdateSettingsRequest,

            crate::entities::images::SaveImageRequest,
            crate::entities::images::ImageResponse,

            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentHealthStatus,

            bp_tracker_domain::entities::BPStatus,
            bp_tracker_domain::entities::BPThreshold,
            bp_tracker_domain::entities::DarkMode,
            bp_tracker_domain::entities::Gender,
            bp_tracker_domain::entities::DateRangePreset,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "records", description = "Blood pressure records, statistics and classification"),
        (name = "reminders", description = "Medication and measurement reminders"),
        (name = "settings", description = "User profile and application settings"),
        (name = "images", description = "Photos attached to records")
    ),
    info(
        title = "BP Tracker API",
        version = "0.1.0",
        description = "Local API over the blood pressure tracker core",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local server")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_doc_generation() {
        let openapi = ApiDoc::openapi();

        assert_eq!(openapi.info.title, "BP Tracker API");
        assert_eq!(openapi.info.version, "0.1.0");

        let tags = openapi.tags.as_ref().unwrap();
        for name in ["health", "records", "reminders", "settings", "images"] {
            assert!(tags.iter().any(|tag| tag.name == name), "missing tag {}", name);
        }

        for path in [
            "/health",
            "/api/v1/records",
            "/api/v1/records/{id}",
            "/api/v1/records/{id}/status",
            "/api/v1/classify",
            "/api/v1/reminders/{kind}/{id}/toggle",
            "/api/v1/settings/threshold",
            "/api/v1/images",
        ] {
            assert!(openapi.paths.paths.contains_key(path), "missing path {}", path);
        }
    }

    #[test]
    fn test_swagger_ui_creation() {
        let _swagger = configure_swagger_routes();
    }
}
