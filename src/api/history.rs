use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::state::MonitorState;

#[derive(Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

// GET /api/sensor-data
pub async fn get_sensor_data(
    Extension(state): Extension<Arc<MonitorState>>,
    Query(query): Query<LimitQuery>,
) -> impl IntoResponse {
    let data = state.recent_samples(query.limit.unwrap_or(20)).await;
    Json(json!({ "count": data.len(), "data": data }))
}

// GET /api/alerts
pub async fn get_alerts(
    Extension(state): Extension<Arc<MonitorState>>,
    Query(query): Query<LimitQuery>,
) -> impl IntoResponse {
    let alerts = state.recent_alerts(query.limit.unwrap_or(50)).await;
    Json(json!({ "count": alerts.len(), "alerts": alerts }))
}

// GET /api/statistics
pub async fn get_statistics(
    Extension(state): Extension<Arc<MonitorState>>,
) -> impl IntoResponse {
    let stats = state.statistics().await;
    Json(json!({
        "total_readings": stats.total_readings,
        "total_alerts": stats.total_alerts,
        "total_dogs_monitored": stats.total_dogs_monitored,
        "average_temperature": round2(stats.average_temperature),
        "average_activity": round2(stats.average_activity),
        "system_status": "Active",
        "last_updated": chrono::Utc::now().naive_utc(),
    }))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
