use std::sync::Arc;

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::monitor::behavior;
use crate::state::MonitorState;

#[derive(Deserialize)]
pub struct BehaviorRequest {
    #[serde(default = "default_dog_name")]
    pub dog_name: String,
    #[serde(default = "default_activity")]
    pub activity_percent: f64,
    #[serde(default = "default_duration")]
    pub duration_minutes: i64,
}

fn default_dog_name() -> String {
    "Unknown".to_string()
}

fn default_activity() -> f64 {
    50.0
}

fn default_duration() -> i64 {
    30
}

#[derive(Serialize)]
pub struct BehaviorResponse {
    pub dog_name: String,
    pub behavior_type: String,
    pub activity_percent: f64,
    pub duration_minutes: i64,
    pub alerts: Vec<String>,
    pub timestamp: NaiveDateTime,
    pub stress_level: String,
}

// POST /api/behavior-analysis
pub async fn behavior_analysis(
    Extension(state): Extension<Arc<MonitorState>>,
    Json(payload): Json<BehaviorRequest>,
) -> Response {
    // The erratic-pattern check looks at the last three buffered readings.
    let recent: Vec<f64> = state
        .recent_samples(3)
        .await
        .iter()
        .map(|s| s.activity_percent)
        .collect();

    let assessment = behavior::classify(payload.activity_percent, &recent);

    (
        StatusCode::OK,
        Json(BehaviorResponse {
            dog_name: payload.dog_name,
            behavior_type: assessment.behavior_type,
            activity_percent: payload.activity_percent,
            duration_minutes: payload.duration_minutes,
            alerts: assessment.alerts,
            timestamp: chrono::Utc::now().naive_utc(),
            stress_level: assessment.stress_level,
        }),
    )
        .into_response()
}
