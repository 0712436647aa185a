pub mod model;

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::monitor::Severity;
use model::{Features, ModelError, Predictor};

pub use model::load_predictor;

/// Breed code for breeds missing from the mapping.
pub const UNKNOWN_BREED: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionKind {
    #[serde(rename = "First Heat")]
    FirstHeat,
    #[serde(rename = "Next Heat")]
    NextHeat,
}

impl PredictionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionKind::FirstHeat => "First Heat",
            PredictionKind::NextHeat => "Next Heat",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionUnit {
    Months,
    Days,
}

impl PredictionUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionUnit::Months => "months",
            PredictionUnit::Days => "days",
        }
    }
}

/// A completed fertility-cycle prediction, also the payload upserted into
/// the profile store and mirrored to the durable heat-cycle history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FertilityPrediction {
    pub dog_name: String,
    pub breed: String,
    pub age_months: i32,
    pub weight_kg: f64,
    pub prediction_type: PredictionKind,
    pub prediction_value: f64,
    pub prediction_unit: PredictionUnit,
    pub estimated_date: NaiveDate,
    pub fertility_status: String,
    pub alert_level: Severity,
    pub timestamp: NaiveDateTime,
}

/// Request-side inputs for one prediction.
#[derive(Debug, Clone)]
pub struct FertilityInput {
    pub dog_name: String,
    pub breed: String,
    pub age_months: i32,
    pub weight_kg: f64,
    /// `None` selects the first-heat model.
    pub last_heat_days: Option<i64>,
}

/// The two loaded regressors plus the breed lookup, treated as one
/// capability: present or absent as a whole.
pub struct FertilityService {
    first_heat: Box<dyn Predictor>,
    next_heat: Box<dyn Predictor>,
    breeds: BTreeMap<String, i32>,
}

impl FertilityService {
    pub fn new(
        first_heat: Box<dyn Predictor>,
        next_heat: Box<dyn Predictor>,
        breeds: BTreeMap<String, i32>,
    ) -> Self {
        Self {
            first_heat,
            next_heat,
            breeds,
        }
    }

    /// Load `first_heat.json`, `next_heat.json` and `breed_mapping.json`
    /// from the artifact directory.
    pub fn load(model_dir: &Path) -> Result<Self, ModelError> {
        Ok(Self {
            first_heat: model::load_predictor(&model_dir.join("first_heat.json"))?,
            next_heat: model::load_predictor(&model_dir.join("next_heat.json"))?,
            breeds: model::load_breed_mapping(&model_dir.join("breed_mapping.json"))?,
        })
    }

    /// Known breed names, already sorted.
    pub fn breeds(&self) -> Vec<String> {
        self.breeds.keys().cloned().collect()
    }

    pub fn predict(&self, input: &FertilityInput, now: NaiveDateTime) -> FertilityPrediction {
        let days_since_last_heat = input.last_heat_days.unwrap_or(0);
        let features = derive_features(
            &self.breeds,
            &input.breed,
            input.age_months,
            input.weight_kg,
            days_since_last_heat,
        );

        match input.last_heat_days {
            None => {
                let months = self.first_heat.predict(&features);
                // int() truncation of the original date arithmetic
                let estimated_date = (now + Duration::days((months * 30.0) as i64)).date();
                FertilityPrediction {
                    dog_name: input.dog_name.clone(),
                    breed: input.breed.clone(),
                    age_months: input.age_months,
                    weight_kg: input.weight_kg,
                    prediction_type: PredictionKind::FirstHeat,
                    prediction_value: round1(months),
                    prediction_unit: PredictionUnit::Months,
                    estimated_date,
                    fertility_status: "Puppy - Awaiting First Heat".to_string(),
                    alert_level: Severity::Low,
                    timestamp: now,
                }
            }
            Some(_) => {
                let days = self.next_heat.predict(&features);
                let estimated_date = (now + Duration::days(days as i64)).date();
                let (fertility_status, alert_level) = if days <= 7.0 {
                    ("Imminent Heat Cycle", Severity::High)
                } else if days <= 30.0 {
                    ("Approaching Heat Cycle", Severity::Medium)
                } else {
                    ("Normal Cycle", Severity::Low)
                };
                FertilityPrediction {
                    dog_name: input.dog_name.clone(),
                    breed: input.breed.clone(),
                    age_months: input.age_months,
                    weight_kg: input.weight_kg,
                    prediction_type: PredictionKind::NextHeat,
                    prediction_value: round1(days),
                    prediction_unit: PredictionUnit::Days,
                    estimated_date,
                    fertility_status: fertility_status.to_string(),
                    alert_level,
                    timestamp: now,
                }
            }
        }
    }
}

/// Derive the 7-feature vector the models were trained on.
pub fn derive_features(
    breeds: &BTreeMap<String, i32>,
    breed: &str,
    age_months: i32,
    weight_kg: f64,
    days_since_last_heat: i64,
) -> Features {
    Features {
        age_months: age_months as f64,
        weight_kg,
        breed_enc: breeds.get(breed).copied().unwrap_or(UNKNOWN_BREED) as f64,
        days_since_last_heat: days_since_last_heat as f64,
        weight_category: weight_category(weight_kg) as f64,
        age_category: age_category(age_months) as f64,
        weight_age_ratio: weight_kg / (age_months as f64 + 1.0),
    }
}

/// Small <10 kg, medium <25 kg, large otherwise.
pub fn weight_category(weight_kg: f64) -> i32 {
    if weight_kg < 10.0 {
        0
    } else if weight_kg < 25.0 {
        1
    } else {
        2
    }
}

/// Puppy <12 mo, young <36 mo, adult otherwise.
pub fn age_category(age_months: i32) -> i32 {
    if age_months < 12 {
        0
    } else if age_months < 36 {
        1
    } else {
        2
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
