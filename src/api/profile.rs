use std::sync::Arc;

use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::state::{DogProfile, MonitorState};
use crate::store::ProfileStore;

use super::history::LimitQuery;

// GET /api/dog-profile/:name
pub async fn get_profile(
    Extension(state): Extension<Arc<MonitorState>>,
    Extension(store): Extension<Arc<dyn ProfileStore>>,
    Path(name): Path<String>,
) -> Response {
    // Durable mirror first, local map as fallback.
    match store.fetch_profile(&name).await {
        Ok(Some(profile)) => return (StatusCode::OK, Json(profile)).into_response(),
        Ok(None) => {}
        Err(e) => warn!("Mirror profile read failed: {}", e),
    }

    match state.get_profile(&name).await {
        Some(profile) => (StatusCode::OK, Json(profile)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Dog profile not found"})),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub age_months: i32,
    #[serde(default)]
    pub weight_kg: f64,
}

// POST /api/dog-profile
pub async fn upsert_profile(
    Extension(state): Extension<Arc<MonitorState>>,
    Extension(store): Extension<Arc<dyn ProfileStore>>,
    Json(payload): Json<ProfileRequest>,
) -> Response {
    if payload.name.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Dog name is required"})),
        )
            .into_response();
    }

    let profile = DogProfile {
        name: payload.name,
        breed: payload.breed,
        age_months: payload.age_months,
        weight_kg: payload.weight_kg,
        last_updated: chrono::Utc::now().naive_utc(),
        latest_prediction: None,
    };

    let merged = state.merge_profile(profile).await;
    crate::metrics::set_profiles_total(state.profile_count().await);

    if let Err(e) = store.save_profile(&merged).await {
        warn!("Mirror profile write failed: {}", e);
        crate::metrics::record_mirror_failure("save_profile");
    }

    (
        StatusCode::OK,
        Json(json!({"success": true, "profile": merged})),
    )
        .into_response()
}

// GET /api/all-profiles
pub async fn get_all_profiles(
    Extension(state): Extension<Arc<MonitorState>>,
    Extension(store): Extension<Arc<dyn ProfileStore>>,
) -> impl IntoResponse {
    let profiles = match store.list_profiles().await {
        Ok(profiles) if !profiles.is_empty() => profiles,
        Ok(_) => state.all_profiles().await,
        Err(e) => {
            warn!("Mirror profile list failed: {}", e);
            state.all_profiles().await
        }
    };

    Json(json!({ "count": profiles.len(), "profiles": profiles }))
}

// GET /api/heat-cycles/:name
pub async fn get_heat_cycles(
    Extension(store): Extension<Arc<dyn ProfileStore>>,
    Path(name): Path<String>,
    Query(query): Query<LimitQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(20) as u64;
    match store.query_cycles(&name, limit).await {
        Ok(cycles) => Json(json!({ "count": cycles.len(), "cycles": cycles })),
        Err(e) => {
            warn!("Mirror heat-cycle read failed: {}", e);
            Json(json!({ "count": 0, "cycles": [] }))
        }
    }
}
