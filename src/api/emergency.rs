use std::sync::Arc;

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::monitor::emergency::{self, EmergencyCondition, EmergencyLevel};
use crate::state::{AlertCategory, AlertRecord, MonitorState};

#[derive(Deserialize)]
pub struct EmergencyRequest {
    #[serde(default = "default_dog_name")]
    pub dog_name: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_activity")]
    pub activity_percent: f64,
    #[serde(default)]
    pub immobile_duration: u64,
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
pub struct EmergencyResponse {
    pub dog_name: String,
    pub emergency_level: EmergencyLevel,
    pub emergencies: Vec<EmergencyCondition>,
    pub temperature: f64,
    pub activity_percent: f64,
    pub immobile_duration: u64,
    pub timestamp: NaiveDateTime,
}

// POST /api/emergency-check
pub async fn emergency_check(
    Extension(config): Extension<Arc<AppConfig>>,
    Extension(state): Extension<Arc<MonitorState>>,
    Json(payload): Json<EmergencyRequest>,
) -> Response {
    let assessment = emergency::detect(
        &config.thresholds,
        payload.temperature,
        payload.activity_percent,
        payload.immobile_duration,
    );
    let now = chrono::Utc::now().naive_utc();

    // Any triggered emergency goes to the alert history, whatever its tier.
    if !assessment.emergencies.is_empty() {
        state
            .record_alert(AlertRecord {
                dog_name: payload.dog_name.clone(),
                category: AlertCategory::Emergency,
                severity: assessment.emergency_level.to_severity(),
                messages: assessment
                    .emergencies
                    .iter()
                    .map(|e| e.message.clone())
                    .collect(),
                timestamp: now,
            })
            .await;
    }

    (
        StatusCode::OK,
        Json(EmergencyResponse {
            dog_name: payload.dog_name,
            emergency_level: assessment.emergency_level,
            emergencies: assessment.emergencies,
            temperature: payload.temperature,
            activity_percent: payload.activity_percent,
            immobile_duration: payload.immobile_duration,
            timestamp: now,
        }),
    )
        .into_response()
}
