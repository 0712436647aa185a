use std::sync::Arc;

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::AppConfig;
use crate::fertility::FertilityService;
use crate::monitor::{health, Severity};
use crate::state::{AlertCategory, AlertRecord, MonitorState, TelemetrySample};

// GET /api/health
pub async fn api_health(
    Extension(models): Extension<Option<Arc<FertilityService>>>,
) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().naive_utc(),
        "models_loaded": models.is_some(),
    }))
}

#[derive(Deserialize)]
pub struct HealthCheckRequest {
    #[serde(default = "default_dog_name")]
    pub dog_name: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_activity")]
    pub activity_percent: f64,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

fn default_dog_name() -> String {
    "Unknown".to_string()
}

fn default_temperature() -> f64 {
    38.5
}

fn default_activity() -> f64 {
    50.0
}

#[derive(Serialize)]
pub struct HealthCheckResponse {
    pub dog_name: String,
    pub temperature: f64,
    pub activity_percent: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub health_status: String,
    pub alerts: Vec<String>,
    pub severity: Severity,
    pub timestamp: NaiveDateTime,
    pub recommendations: Vec<String>,
}

// POST /api/health-check
pub async fn health_check(
    Extension(config): Extension<Arc<AppConfig>>,
    Extension(state): Extension<Arc<MonitorState>>,
    Json(payload): Json<HealthCheckRequest>,
) -> Response {
    let assessment = health::evaluate(
        &config.thresholds,
        payload.temperature,
        payload.activity_percent,
    );
    let now = chrono::Utc::now().naive_utc();

    // Every reading lands in the sensor history; only medium and above
    // reach the alert history.
    state
        .record_sample(TelemetrySample {
            dog_name: payload.dog_name.clone(),
            temperature: payload.temperature,
            activity_percent: payload.activity_percent,
            latitude: payload.latitude,
            longitude: payload.longitude,
            timestamp: now,
        })
        .await;

    if assessment.severity >= Severity::Medium {
        state
            .record_alert(AlertRecord {
                dog_name: payload.dog_name.clone(),
                category: AlertCategory::Health,
                severity: assessment.severity,
                messages: assessment.alerts.clone(),
                timestamp: now,
            })
            .await;
    }

    (
        StatusCode::OK,
        Json(HealthCheckResponse {
            dog_name: payload.dog_name,
            temperature: payload.temperature,
            activity_percent: payload.activity_percent,
            latitude: payload.latitude,
            longitude: payload.longitude,
            health_status: assessment.health_status,
            alerts: assessment.alerts,
            severity: assessment.severity,
            timestamp: now,
            recommendations: assessment.recommendations,
        }),
    )
        .into_response()
}
