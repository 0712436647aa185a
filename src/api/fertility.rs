use std::sync::Arc;

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Deserializer};
use serde_json::json;
use tracing::warn;

use crate::fertility::{FertilityInput, FertilityService};
use crate::state::{DogProfile, MonitorState};
use crate::store::ProfileStore;

#[derive(Deserialize)]
pub struct FertilityRequest {
    #[serde(default = "default_dog_name")]
    pub dog_name: String,
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub age_months: i32,
    #[serde(default)]
    pub weight_kg: f64,
    /// Mobile clients send a number, a numeric string, an empty string, or
    /// nothing at all; only the first two select the next-heat model.
    #[serde(default, deserialize_with = "de_last_heat_days")]
    pub last_heat_days: Option<i64>,
}

fn default_dog_name() -> String {
    "Unknown".to_string()
}

fn de_last_heat_days<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(n)) => Ok(Some(n)),
        Some(Raw::Float(f)) => Ok(Some(f as i64)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom("last_heat_days must be a number")),
    }
}

// POST /api/predict-fertility
pub async fn predict_fertility(
    Extension(state): Extension<Arc<MonitorState>>,
    Extension(store): Extension<Arc<dyn ProfileStore>>,
    Extension(models): Extension<Option<Arc<FertilityService>>>,
    Json(payload): Json<FertilityRequest>,
) -> Response {
    let Some(models) = models else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": "ML models not loaded"})),
        )
            .into_response();
    };

    let now = chrono::Utc::now().naive_utc();
    let input = FertilityInput {
        dog_name: payload.dog_name,
        breed: payload.breed,
        age_months: payload.age_months,
        weight_kg: payload.weight_kg,
        last_heat_days: payload.last_heat_days,
    };

    let prediction = models.predict(&input, now);
    crate::metrics::record_prediction(prediction.prediction_type.as_str());

    let profile = DogProfile {
        name: prediction.dog_name.clone(),
        breed: prediction.breed.clone(),
        age_months: prediction.age_months,
        weight_kg: prediction.weight_kg,
        last_updated: now,
        latest_prediction: Some(prediction.clone()),
    };
    state.upsert_profile(profile.clone()).await;
    crate::metrics::set_profiles_total(state.profile_count().await);

    // Best-effort mirror; a failed write never fails the response.
    if let Err(e) = store.save_profile(&profile).await {
        warn!("Mirror profile write failed: {}", e);
        crate::metrics::record_mirror_failure("save_profile");
    }
    if let Err(e) = store.append_cycle(&prediction).await {
        warn!("Mirror heat-cycle write failed: {}", e);
        crate::metrics::record_mirror_failure("append_cycle");
    }

    (StatusCode::OK, Json(prediction)).into_response()
}

// GET /api/breeds
pub async fn get_breeds(
    Extension(models): Extension<Option<Arc<FertilityService>>>,
) -> impl IntoResponse {
    let breeds = models.map(|m| m.breeds()).unwrap_or_default();
    Json(json!({ "breeds": breeds }))
}
