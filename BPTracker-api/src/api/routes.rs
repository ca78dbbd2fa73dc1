use std::time::Duration;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::api::handlers::{health, images, records, reminders, settings};
use crate::api::state::AppState;
use crate::openapi::configure_swagger_routes;

/// Create the application router over the given services
pub fn create_app(state: AppState) -> Router {
    debug!("Creating application router");

    // Static segments are declared before `:id` so they win
    let record_routes = Router::new()
        .route("/records", get(records::list_records).post(records::create_record))
        .route("/records/latest", get(records::get_latest_record))
        .route("/records/statistics", get(records::get_statistics))
        .route("/records/chart", get(records::get_chart_data))
        .route(
            "/records/:id",
            get(records::get_record)
                .patch(records::update_record)
                .delete(records::delete_record),
        )
        .route("/records/:id/status", get(records::get_record_status))
        .route("/classify", get(records::classify_reading))
        .route("/validate", post(records::validate_reading));

    let reminder_routes = Router::new()
        .route(
            "/reminders/:kind",
            get(reminders::list_reminders).post(reminders::create_reminder),
        )
        .route("/reminders/:kind/enabled", get(reminders::list_enabled_reminders))
        .route(
            "/reminders/:kind/:id",
            get(reminders::get_reminder)
                .patch(reminders::update_reminder)
                .delete(reminders::delete_reminder),
        )
        .route("/reminders/:kind/:id/toggle", post(reminders::toggle_reminder));

    let settings_routes = Router::new()
        .route("/profile", get(settings::get_profile).patch(settings::update_profile))
        .route("/settings", get(settings::get_settings).patch(settings::update_settings))
        .route(
            "/settings/threshold",
            get(settings::get_threshold).put(settings::update_threshold),
        )
        .route("/images", post(images::save_image));

    let api_routes = Router::new()
        .merge(record_routes)
        .merge(reminder_routes)
        .merge(settings_routes);

    debug!("API routes configured");

    let app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes)
        .with_state(state);

    let app = add_swagger_ui(app);
    debug!("Swagger UI merged");

    let app = configure_security(app).layer(TraceLayer::new_for_http());

    health::initialize_server_start_time();

    app
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    app.merge(configure_swagger_routes())
}

/// CORS for the local UI shell plus the usual response hardening headers
pub fn configure_security(app: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    let security_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("no-referrer"),
        ));

    app.layer(cors).layer(security_headers)
}
