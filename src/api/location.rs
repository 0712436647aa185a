use std::sync::Arc;

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::monitor::{geofence, Severity};
use crate::state::{AlertCategory, AlertRecord, MonitorState};

#[derive(Deserialize)]
pub struct LocationRequest {
    #[serde(default = "default_dog_name")]
    pub dog_name: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub safe_zone_lat: f64,
    #[serde(default)]
    pub safe_zone_lon: f64,
    pub safe_zone_radius: Option<f64>,
}

fn default_dog_name() -> String {
    "Unknown".to_string()
}

#[derive(Serialize)]
pub struct LocationResponse {
    pub dog_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_from_safe_zone: f64,
    pub is_safe: bool,
    pub alert_type: &'static str,
    pub alert_message: String,
    pub timestamp: NaiveDateTime,
}

// POST /api/location-update
pub async fn location_update(
    Extension(config): Extension<Arc<AppConfig>>,
    Extension(state): Extension<Arc<MonitorState>>,
    Json(payload): Json<LocationRequest>,
) -> Response {
    let radius = payload
        .safe_zone_radius
        .unwrap_or(config.thresholds.default_safe_zone_radius_m);

    let check = geofence::check(
        payload.latitude,
        payload.longitude,
        payload.safe_zone_lat,
        payload.safe_zone_lon,
        radius,
    );
    let now = chrono::Utc::now().naive_utc();

    if !check.is_safe {
        state
            .record_alert(AlertRecord {
                dog_name: payload.dog_name.clone(),
                category: AlertCategory::Geofence,
                severity: Severity::High,
                messages: vec![check.alert_message.clone()],
                timestamp: now,
            })
            .await;
    }

    (
        StatusCode::OK,
        Json(LocationResponse {
            dog_name: payload.dog_name,
            latitude: payload.latitude,
            longitude: payload.longitude,
            distance_from_safe_zone: check.distance_from_safe_zone,
            is_safe: check.is_safe,
            alert_type: check.alert_type,
            alert_message: check.alert_message,
            timestamp: now,
        }),
    )
        .into_response()
}
