pub mod behavior;
pub mod emergency;
pub mod fertility;
pub mod health;
pub mod history;
pub mod location;
pub mod profile;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::fertility::FertilityService;
use crate::state::MonitorState;
use crate::store::ProfileStore;

/// Assemble the application router with all collaborators injected.
///
/// The prometheus layer and `/metrics` route are wired by the server
/// binary, which owns the metric handle.
pub fn create_app(
    config: Arc<AppConfig>,
    state: Arc<MonitorState>,
    store: Arc<dyn ProfileStore>,
    models: Option<Arc<FertilityService>>,
) -> Router {
    let cors = cors_layer(&config.cors_origins);

    Router::new()
        .route("/api/health", get(health::api_health))
        .route("/api/health-check", post(health::health_check))
        .route("/api/behavior-analysis", post(behavior::behavior_analysis))
        .route("/api/location-update", post(location::location_update))
        .route("/api/emergency-check", post(emergency::emergency_check))
        .route("/api/predict-fertility", post(fertility::predict_fertility))
        .route("/api/breeds", get(fertility::get_breeds))
        .route("/api/sensor-data", get(history::get_sensor_data))
        .route("/api/alerts", get(history::get_alerts))
        .route("/api/statistics", get(history::get_statistics))
        .route("/api/dog-profile", post(profile::upsert_profile))
        .route("/api/dog-profile/:name", get(profile::get_profile))
        .route("/api/all-profiles", get(profile::get_all_profiles))
        .route("/api/heat-cycles/:name", get(profile::get_heat_cycles))
        .layer(Extension(config))
        .layer(Extension(state))
        .layer(Extension(store))
        .layer(Extension(models))
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<axum::body::Body>| {
                    let matched_path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched| matched.as_str());
                    tracing::info_span!(
                        "request",
                        method = ?request.method(),
                        path = matched_path.unwrap_or_else(|| request.uri().path()),
                    )
                },
            ),
        )
        .layer(cors)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [axum::http::Method::GET, axum::http::Method::POST];
    let headers = [axum::http::header::CONTENT_TYPE];

    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers)
    } else {
        let parsed: Vec<axum::http::HeaderValue> =
            origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods(methods)
            .allow_headers(headers)
    }
}
