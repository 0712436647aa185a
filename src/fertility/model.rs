use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Feature vector consumed by the regression models, in the order the
/// trainer emits weights for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    pub age_months: f64,
    pub weight_kg: f64,
    pub breed_enc: f64,
    pub days_since_last_heat: f64,
    pub weight_category: f64,
    pub age_category: f64,
    pub weight_age_ratio: f64,
}

impl Features {
    pub const COUNT: usize = 7;

    pub fn as_array(&self) -> [f64; Self::COUNT] {
        [
            self.age_months,
            self.weight_kg,
            self.breed_enc,
            self.days_since_last_heat,
            self.weight_category,
            self.age_category,
            self.weight_age_ratio,
        ]
    }

    pub fn from_array(values: [f64; Self::COUNT]) -> Self {
        Self {
            age_months: values[0],
            weight_kg: values[1],
            breed_enc: values[2],
            days_since_last_heat: values[3],
            weight_category: values[4],
            age_category: values[5],
            weight_age_ratio: values[6],
        }
    }
}

/// Opaque regression model: a 7-feature vector in, a scalar out.
///
/// Implementations are selected by the artifact's `kind` tag at load time,
/// so the serving core never branches on the concrete model.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &Features) -> f64;
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse model artifact {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("model artifact {path} expects {got} weights, need {need}")]
    WeightCount {
        path: String,
        got: usize,
        need: usize,
    },
}

/// Ridge-regression weights, one per feature, plus an intercept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearParams {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl Predictor for LinearParams {
    fn predict(&self, features: &Features) -> f64 {
        let x = features.as_array();
        self.intercept
            + self
                .weights
                .iter()
                .zip(x.iter())
                .map(|(w, v)| w * v)
                .sum::<f64>()
    }
}

/// One regression stump: goes left when `feature < threshold`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stump {
    pub feature: usize,
    pub threshold: f64,
    pub left_value: f64,
    pub right_value: f64,
}

impl Stump {
    pub fn predict(&self, x: &[f64]) -> f64 {
        if x[self.feature] < self.threshold {
            self.left_value
        } else {
            self.right_value
        }
    }
}

/// Additive ensemble of regression stumps fitted to residuals, the
/// gradient-boosting shape the offline trainer produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StumpEnsembleParams {
    pub base_score: f64,
    pub learning_rate: f64,
    pub stumps: Vec<Stump>,
}

impl Predictor for StumpEnsembleParams {
    fn predict(&self, features: &Features) -> f64 {
        let x = features.as_array();
        self.base_score
            + self.learning_rate
                * self.stumps.iter().map(|s| s.predict(&x)).sum::<f64>()
    }
}

/// Serialized model artifact, tagged by kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearParams),
    BoostedStumps(StumpEnsembleParams),
}

/// Load a predictor from a JSON artifact written by the trainer.
pub fn load_predictor(path: &Path) -> Result<Box<dyn Predictor>, ModelError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: display.clone(),
        source,
    })?;
    let artifact: ModelArtifact =
        serde_json::from_str(&raw).map_err(|source| ModelError::Parse {
            path: display.clone(),
            source,
        })?;

    match artifact {
        ModelArtifact::Linear(params) => {
            if params.weights.len() != Features::COUNT {
                return Err(ModelError::WeightCount {
                    path: display,
                    got: params.weights.len(),
                    need: Features::COUNT,
                });
            }
            Ok(Box::new(params))
        }
        ModelArtifact::BoostedStumps(params) => {
            if let Some(bad) = params.stumps.iter().find(|s| s.feature >= Features::COUNT) {
                return Err(ModelError::WeightCount {
                    path: display,
                    got: bad.feature,
                    need: Features::COUNT,
                });
            }
            Ok(Box::new(params))
        }
    }
}

/// Breed → integer code lookup written by the trainer.
pub fn load_breed_mapping(path: &Path) -> Result<BTreeMap<String, i32>, ModelError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ModelError::Parse {
        path: display,
        source,
    })
}
