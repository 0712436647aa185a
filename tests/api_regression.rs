//! API regression tests.
//!
//! In-process tests that build the axum app via `create_app()` and exercise
//! the /api/* endpoints with `tower::ServiceExt::oneshot()`. No binary
//! spawn, no network port, no database — the no-op store and stub
//! predictors stand in for the external collaborators.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use caninecare_server::api::create_app;
use caninecare_server::config::AppConfig;
use caninecare_server::fertility::model::{Features, Predictor};
use caninecare_server::fertility::FertilityService;
use caninecare_server::state::MonitorState;
use caninecare_server::store::NullStore;

/// Stub regressor with a fixed output.
struct Constant(f64);

impl Predictor for Constant {
    fn predict(&self, _features: &Features) -> f64 {
        self.0
    }
}

fn stub_models(first_heat: f64, next_heat: f64) -> FertilityService {
    let mut breeds = BTreeMap::new();
    breeds.insert("Beagle".to_string(), 0);
    breeds.insert("Golden Retriever".to_string(), 1);
    breeds.insert("Poodle".to_string(), 2);
    FertilityService::new(
        Box::new(Constant(first_heat)),
        Box::new(Constant(next_heat)),
        breeds,
    )
}

fn build_app(config: AppConfig, models: Option<FertilityService>) -> Router {
    let config = Arc::new(config);
    let state = MonitorState::new(&config);
    create_app(config, state, Arc::new(NullStore), models.map(Arc::new))
}

fn default_app() -> Router {
    build_app(AppConfig::default(), Some(stub_models(9.0, 180.0)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

#[tokio::test]
async fn get_endpoints_return_200() {
    let app = default_app();
    for uri in [
        "/api/health",
        "/api/sensor-data",
        "/api/alerts",
        "/api/statistics",
        "/api/all-profiles",
        "/api/breeds",
        "/api/heat-cycles/Rex",
    ] {
        let (status, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "GET {uri}");
    }
}

#[tokio::test]
async fn health_reports_model_presence() {
    let (_, body) = get(&default_app(), "/api/health").await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["models_loaded"], true);

    let app = build_app(AppConfig::default(), None);
    let (_, body) = get(&app, "/api/health").await;
    assert_eq!(body["models_loaded"], false);
}

#[tokio::test]
async fn normal_health_check_has_no_alerts() {
    let app = default_app();
    let (status, body) = post(
        &app,
        "/api/health-check",
        json!({"temperature": 38.5, "activity_percent": 65}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["health_status"], "Normal");
    assert_eq!(body["severity"], "low");
    assert_eq!(body["alerts"], json!([]));

    // Nothing below medium reaches the alert history.
    let (_, alerts) = get(&app, "/api/alerts").await;
    assert_eq!(alerts["count"], 0);
}

#[tokio::test]
async fn critical_fever_is_recorded_as_alert() {
    let app = default_app();
    let (_, body) = post(
        &app,
        "/api/health-check",
        json!({"dog_name": "Max", "temperature": 40.2, "activity_percent": 55}),
    )
    .await;
    assert_eq!(body["health_status"], "Critical Fever");
    assert_eq!(body["severity"], "critical");

    let (_, alerts) = get(&app, "/api/alerts").await;
    assert_eq!(alerts["count"], 1);
    assert_eq!(alerts["alerts"][0]["category"], "health");
    assert_eq!(alerts["alerts"][0]["severity"], "critical");
    assert_eq!(alerts["alerts"][0]["dog_name"], "Max");
}

#[tokio::test]
async fn sensor_buffer_evicts_oldest_beyond_capacity() {
    let config = AppConfig {
        sensor_buffer_capacity: 3,
        ..AppConfig::default()
    };
    let app = build_app(config, None);

    for i in 0..4 {
        let (status, _) = post(
            &app,
            "/api/health-check",
            json!({"dog_name": format!("dog-{i}"), "temperature": 38.5, "activity_percent": 50}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = get(&app, "/api/sensor-data?limit=10").await;
    assert_eq!(body["count"], 3);
    // dog-0 was evicted; the window starts at dog-1.
    assert_eq!(body["data"][0]["dog_name"], "dog-1");
    assert_eq!(body["data"][2]["dog_name"], "dog-3");
}

#[tokio::test]
async fn geofence_boundary_and_breach() {
    let app = default_app();

    // Same point: distance zero, safe.
    let (_, body) = post(
        &app,
        "/api/location-update",
        json!({
            "dog_name": "Luna",
            "latitude": 52.52, "longitude": 13.405,
            "safe_zone_lat": 52.52, "safe_zone_lon": 13.405
        }),
    )
    .await;
    assert_eq!(body["distance_from_safe_zone"], 0.0);
    assert_eq!(body["is_safe"], true);
    assert_eq!(body["alert_type"], "none");

    // ~111 m away with a 100 m radius: breach, recorded as an alert.
    let (_, body) = post(
        &app,
        "/api/location-update",
        json!({
            "dog_name": "Luna",
            "latitude": 52.521, "longitude": 13.405,
            "safe_zone_lat": 52.52, "safe_zone_lon": 13.405,
            "safe_zone_radius": 100.0
        }),
    )
    .await;
    assert_eq!(body["is_safe"], false);
    assert_eq!(body["alert_type"], "geofence_breach");

    let (_, alerts) = get(&app, "/api/alerts").await;
    assert_eq!(alerts["count"], 1);
    assert_eq!(alerts["alerts"][0]["category"], "geofence");
}

#[tokio::test]
async fn emergency_conditions_co_occur() {
    let app = default_app();
    let (_, body) = post(
        &app,
        "/api/emergency-check",
        json!({
            "dog_name": "Rocky",
            "temperature": 40.5,
            "activity_percent": 10,
            "immobile_duration": 3600
        }),
    )
    .await;

    assert_eq!(body["emergency_level"], "critical");
    let kinds: Vec<&str> = body["emergencies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["type"].as_str().unwrap())
        .collect();
    assert!(kinds.contains(&"Critical Fever"), "{kinds:?}");
    assert!(kinds.contains(&"Prolonged Immobility"), "{kinds:?}");

    let (_, alerts) = get(&app, "/api/alerts").await;
    assert_eq!(alerts["count"], 1);
    assert_eq!(alerts["alerts"][0]["category"], "emergency");
}

#[tokio::test]
async fn behavior_bands_and_stress_label() {
    let app = default_app();
    let (_, body) = post(
        &app,
        "/api/behavior-analysis",
        json!({"dog_name": "Max", "activity_percent": 85, "duration_minutes": 20}),
    )
    .await;
    assert_eq!(body["behavior_type"], "Hyperactive");
    assert_eq!(body["stress_level"], "High");

    // The documented threshold mismatch: low band, depression stress label.
    let (_, body) = post(
        &app,
        "/api/behavior-analysis",
        json!({"activity_percent": 15}),
    )
    .await;
    assert_eq!(body["behavior_type"], "Low Activity");
    assert_eq!(body["stress_level"], "Low (Possible Depression)");
}

#[tokio::test]
async fn behavior_flags_erratic_swings_from_history() {
    let app = default_app();
    for activity in [5.0, 95.0, 5.0] {
        post(
            &app,
            "/api/health-check",
            json!({"temperature": 38.5, "activity_percent": activity}),
        )
        .await;
    }

    let (_, body) = post(
        &app,
        "/api/behavior-analysis",
        json!({"activity_percent": 45}),
    )
    .await;
    let alerts = body["alerts"].as_array().unwrap();
    assert!(
        alerts.iter().any(|a| a == "Erratic behavior pattern detected"),
        "{alerts:?}"
    );
}

#[tokio::test]
async fn fertility_first_heat_when_last_heat_absent() {
    let app = default_app();
    let (status, body) = post(
        &app,
        "/api/predict-fertility",
        json!({
            "dog_name": "Bella",
            "breed": "Golden Retriever",
            "age_months": 8,
            "weight_kg": 25.5
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction_type"], "First Heat");
    assert_eq!(body["prediction_unit"], "months");
    assert_eq!(body["fertility_status"], "Puppy - Awaiting First Heat");
    assert_eq!(body["alert_level"], "low");
    assert_eq!(body["prediction_value"], 9.0);
}

#[tokio::test]
async fn fertility_empty_string_selects_first_heat() {
    let app = default_app();
    let (_, body) = post(
        &app,
        "/api/predict-fertility",
        json!({
            "dog_name": "Bella",
            "breed": "Poodle",
            "age_months": 10,
            "weight_kg": 7.0,
            "last_heat_days": ""
        }),
    )
    .await;
    assert_eq!(body["prediction_type"], "First Heat");
}

#[tokio::test]
async fn fertility_imminent_next_heat() {
    let app = build_app(AppConfig::default(), Some(stub_models(9.0, 5.0)));
    let (_, body) = post(
        &app,
        "/api/predict-fertility",
        json!({
            "dog_name": "Bella",
            "breed": "Beagle",
            "age_months": 30,
            "weight_kg": 12.0,
            "last_heat_days": 5
        }),
    )
    .await;
    assert_eq!(body["prediction_type"], "Next Heat");
    assert_eq!(body["prediction_unit"], "days");
    assert_eq!(body["fertility_status"], "Imminent Heat Cycle");
    assert_eq!(body["alert_level"], "high");
}

#[tokio::test]
async fn fertility_unavailable_without_models() {
    let app = build_app(AppConfig::default(), None);
    let (status, body) = post(
        &app,
        "/api/predict-fertility",
        json!({"dog_name": "Bella", "breed": "Beagle", "age_months": 8, "weight_kg": 10.0}),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "ML models not loaded");
}

#[tokio::test]
async fn prediction_is_visible_in_profile() {
    let app = default_app();
    post(
        &app,
        "/api/predict-fertility",
        json!({"dog_name": "Bella", "breed": "Beagle", "age_months": 8, "weight_kg": 10.0}),
    )
    .await;

    let (status, body) = get(&app, "/api/dog-profile/Bella").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Bella");
    assert_eq!(body["latest_prediction"]["prediction_type"], "First Heat");
}

#[tokio::test]
async fn profile_round_trip() {
    let app = default_app();

    let (status, body) = post(
        &app,
        "/api/dog-profile",
        json!({"name": "Rex", "breed": "Beagle", "age_months": 24, "weight_kg": 12.5}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = get(&app, "/api/dog-profile/Rex").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Rex");
    assert_eq!(body["breed"], "Beagle");
    assert_eq!(body["age_months"], 24);
    assert_eq!(body["weight_kg"], 12.5);

    let (_, body) = get(&app, "/api/all-profiles").await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn profile_requires_name() {
    let (status, body) = post(
        &default_app(),
        "/api/dog-profile",
        json!({"breed": "Beagle"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Dog name is required");
}

#[tokio::test]
async fn unknown_profile_is_404() {
    let (status, body) = get(&default_app(), "/api/dog-profile/Nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Dog profile not found");
}

#[tokio::test]
async fn breeds_are_sorted_and_degrade_to_empty() {
    let (_, body) = get(&default_app(), "/api/breeds").await;
    assert_eq!(
        body["breeds"],
        json!(["Beagle", "Golden Retriever", "Poodle"])
    );

    let app = build_app(AppConfig::default(), None);
    let (status, body) = get(&app, "/api/breeds").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["breeds"], json!([]));
}

#[tokio::test]
async fn statistics_track_readings_and_alerts() {
    let app = default_app();
    post(
        &app,
        "/api/health-check",
        json!({"temperature": 38.0, "activity_percent": 40}),
    )
    .await;
    post(
        &app,
        "/api/health-check",
        json!({"temperature": 39.0, "activity_percent": 60}),
    )
    .await;
    // One alerting reading.
    post(
        &app,
        "/api/health-check",
        json!({"temperature": 40.5, "activity_percent": 50}),
    )
    .await;

    let (_, body) = get(&app, "/api/statistics").await;
    assert_eq!(body["total_readings"], 3);
    assert_eq!(body["total_alerts"], 1);
    assert_eq!(body["system_status"], "Active");
    assert_eq!(body["average_activity"], 50.0);
    let avg_temp = body["average_temperature"].as_f64().unwrap();
    assert!((avg_temp - 39.17).abs() < 0.01, "{avg_temp}");
}

#[tokio::test]
async fn heat_cycles_empty_without_mirror() {
    let (status, body) = get(&default_app(), "/api/heat-cycles/Bella?limit=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["cycles"], json!([]));
}
