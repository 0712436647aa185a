//! Offline model training tool.
//!
//! Reads the heat-cycle dataset, derives the same 7 features the server
//! uses, fits a ridge regression and a boosted-stump ensemble for each of
//! the two targets (first-heat age in months, next-heat due in days), and
//! writes the better-scoring artifact per target plus the breed mapping.
//!
//! Usage: `trainer [data.csv] [output_dir]`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use caninecare_server::fertility::derive_features;
use caninecare_server::fertility::model::{
    Features, LinearParams, ModelArtifact, Predictor, Stump, StumpEnsembleParams,
};

const RIDGE_ALPHA: f64 = 1.0;
const BOOSTING_ROUNDS: usize = 150;
const LEARNING_RATE: f64 = 0.1;
/// Threshold candidates evaluated per feature per boosting round.
const MAX_SPLIT_CANDIDATES: usize = 32;
/// Every n-th row is held out for evaluation.
const HOLDOUT_STRIDE: usize = 5;

#[derive(Debug, thiserror::Error)]
enum TrainError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("dataset is missing column {0}")]
    MissingColumn(&'static str),
    #[error("dataset has no usable rows")]
    NoData,
}

struct Record {
    features: [f64; Features::COUNT],
    first_heat_months: f64,
    next_heat_days: f64,
}

fn main() {
    tracing_subscriber::fmt().init();

    let args: Vec<String> = std::env::args().collect();
    let data_path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("ml/data/dog.csv"));
    let output_dir = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("ml/models"));

    if let Err(e) = run(&data_path, &output_dir) {
        tracing::error!("Training failed: {}", e);
        std::process::exit(1);
    }
}

fn run(data_path: &Path, output_dir: &Path) -> Result<(), TrainError> {
    let (records, breed_mapping) = load_dataset(data_path)?;
    tracing::info!(
        "Loaded {} records, {} breeds",
        records.len(),
        breed_mapping.len()
    );

    let (train_rows, test_rows): (Vec<(usize, &Record)>, Vec<(usize, &Record)>) = records
        .iter()
        .enumerate()
        .partition(|(i, _)| i % HOLDOUT_STRIDE != 0);
    let train: Vec<&Record> = train_rows.into_iter().map(|(_, r)| r).collect();
    let test: Vec<&Record> = test_rows.into_iter().map(|(_, r)| r).collect();
    if train.is_empty() || test.is_empty() {
        return Err(TrainError::NoData);
    }

    std::fs::create_dir_all(output_dir).map_err(|source| TrainError::Io {
        path: output_dir.display().to_string(),
        source,
    })?;

    let first = train_target(&train, &test, |r| r.first_heat_months, "first heat (months)");
    write_artifact(&output_dir.join("first_heat.json"), &first)?;

    let next = train_target(&train, &test, |r| r.next_heat_days, "next heat (days)");
    write_artifact(&output_dir.join("next_heat.json"), &next)?;

    let mapping_path = output_dir.join("breed_mapping.json");
    let mapping_json =
        serde_json::to_string_pretty(&breed_mapping).unwrap_or_else(|_| "{}".to_string());
    std::fs::write(&mapping_path, mapping_json).map_err(|source| TrainError::Io {
        path: mapping_path.display().to_string(),
        source,
    })?;

    tracing::info!("Artifacts written to {}", output_dir.display());
    Ok(())
}

/// Fit both model families on one target and keep the better holdout RMSE.
fn train_target(
    train: &[&Record],
    test: &[&Record],
    target: impl Fn(&Record) -> f64,
    label: &str,
) -> ModelArtifact {
    let x_train: Vec<[f64; Features::COUNT]> = train.iter().map(|r| r.features).collect();
    let y_train: Vec<f64> = train.iter().map(|r| target(r)).collect();
    let x_test: Vec<[f64; Features::COUNT]> = test.iter().map(|r| r.features).collect();
    let y_test: Vec<f64> = test.iter().map(|r| target(r)).collect();

    let ridge = fit_ridge(&x_train, &y_train, RIDGE_ALPHA);
    let stumps = fit_boosted_stumps(&x_train, &y_train, BOOSTING_ROUNDS, LEARNING_RATE);

    let ridge_eval = evaluate(&ridge, &x_test, &y_test);
    let stump_eval = evaluate(&stumps, &x_test, &y_test);

    tracing::info!(
        "{}: ridge RMSE {:.3} MAE {:.3} R² {:.3} | boosted stumps RMSE {:.3} MAE {:.3} R² {:.3}",
        label,
        ridge_eval.rmse,
        ridge_eval.mae,
        ridge_eval.r2,
        stump_eval.rmse,
        stump_eval.mae,
        stump_eval.r2,
    );

    if stump_eval.rmse <= ridge_eval.rmse {
        tracing::info!("{}: keeping boosted stumps", label);
        ModelArtifact::BoostedStumps(stumps)
    } else {
        tracing::info!("{}: keeping ridge", label);
        ModelArtifact::Linear(ridge)
    }
}

fn write_artifact(path: &Path, artifact: &ModelArtifact) -> Result<(), TrainError> {
    let json = serde_json::to_string_pretty(artifact).unwrap_or_else(|_| "{}".to_string());
    std::fs::write(path, json).map_err(|source| TrainError::Io {
        path: path.display().to_string(),
        source,
    })
}

// ===== Dataset =====

fn load_dataset(path: &Path) -> Result<(Vec<Record>, BTreeMap<String, i32>), TrainError> {
    let raw = std::fs::read_to_string(path).map_err(|source| TrainError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut lines = raw.lines();
    let header: Vec<&str> = lines
        .next()
        .ok_or(TrainError::NoData)?
        .split(',')
        .map(str::trim)
        .collect();

    let col = |name: &'static str| -> Result<usize, TrainError> {
        header
            .iter()
            .position(|h| *h == name)
            .ok_or(TrainError::MissingColumn(name))
    };
    let breed_col = col("Breed")?;
    let age_col = col("Age_Months")?;
    let weight_col = col("Weight_kg")?;
    let last_heat_col = col("Days_Since_Last_Heat")?;
    let first_heat_col = col("First_Heat_Age_Months")?;
    let next_heat_col = col("Next_Heat_Due_Days")?;

    let rows: Vec<Vec<String>> = lines
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.split(',').map(|c| c.trim().to_string()).collect())
        .collect();

    // Breed codes follow sorted unique names, matching the encoding the
    // server applies at inference time.
    let breeds: std::collections::BTreeSet<String> = rows
        .iter()
        .filter_map(|row| row.get(breed_col).cloned())
        .collect();
    let breed_mapping: BTreeMap<String, i32> = breeds
        .into_iter()
        .enumerate()
        .map(|(code, breed)| (breed, code as i32))
        .collect();

    let mut records = Vec::new();
    for row in &rows {
        let field = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");
        let (Ok(age_months), Ok(weight_kg)) =
            (field(age_col).parse::<i32>(), field(weight_col).parse::<f64>())
        else {
            continue;
        };
        // Rows missing either target are dropped.
        let (Ok(first_heat_months), Ok(next_heat_days)) = (
            field(first_heat_col).parse::<f64>(),
            field(next_heat_col).parse::<f64>(),
        ) else {
            continue;
        };
        let days_since_last_heat = field(last_heat_col).parse::<i64>().unwrap_or(0);

        let features = derive_features(
            &breed_mapping,
            field(breed_col),
            age_months,
            weight_kg,
            days_since_last_heat,
        );
        records.push(Record {
            features: features.as_array(),
            first_heat_months,
            next_heat_days,
        });
    }

    if records.is_empty() {
        return Err(TrainError::NoData);
    }
    Ok((records, breed_mapping))
}

// ===== Ridge regression =====

/// Closed-form ridge fit via the normal equations. The intercept rides as
/// an extra all-ones column and is not penalized.
fn fit_ridge(x: &[[f64; Features::COUNT]], y: &[f64], alpha: f64) -> LinearParams {
    const D: usize = Features::COUNT + 1;

    let mut a = vec![vec![0.0; D]; D];
    let mut b = vec![0.0; D];
    for (xi, &yi) in x.iter().zip(y.iter()) {
        let mut row = [0.0; D];
        row[..Features::COUNT].copy_from_slice(xi);
        row[Features::COUNT] = 1.0;
        for i in 0..D {
            b[i] += row[i] * yi;
            for j in 0..D {
                a[i][j] += row[i] * row[j];
            }
        }
    }
    for (i, row) in a.iter_mut().enumerate().take(Features::COUNT) {
        row[i] += alpha;
    }

    let solution = solve_linear_system(a, b).unwrap_or_else(|| vec![0.0; D]);
    LinearParams {
        weights: solution[..Features::COUNT].to_vec(),
        intercept: solution[Features::COUNT],
    }
}

/// Gaussian elimination with partial pivoting.
fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| {
            a[i][col]
                .abs()
                .partial_cmp(&a[j][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for k in (row + 1)..n {
            sum -= a[row][k] * x[k];
        }
        x[row] = sum / a[row][row];
    }
    Some(x)
}

// ===== Boosted stumps =====

fn fit_boosted_stumps(
    x: &[[f64; Features::COUNT]],
    y: &[f64],
    rounds: usize,
    learning_rate: f64,
) -> StumpEnsembleParams {
    let base_score = mean(y);
    let mut residuals: Vec<f64> = y.iter().map(|v| v - base_score).collect();
    let mut stumps = Vec::new();

    for _ in 0..rounds {
        let Some(stump) = best_stump(x, &residuals) else {
            break;
        };
        for (xi, residual) in x.iter().zip(residuals.iter_mut()) {
            *residual -= learning_rate * stump.predict(xi);
        }
        stumps.push(stump);
    }

    StumpEnsembleParams {
        base_score,
        learning_rate,
        stumps,
    }
}

/// Best single split over all features by squared-error reduction on the
/// residuals, or `None` when no split improves.
fn best_stump(x: &[[f64; Features::COUNT]], residuals: &[f64]) -> Option<Stump> {
    let baseline: f64 = residuals.iter().map(|r| r * r).sum();
    let mut best: Option<(f64, Stump)> = None;

    for feature in 0..Features::COUNT {
        let mut values: Vec<f64> = x.iter().map(|xi| xi[feature]).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        values.dedup();
        if values.len() < 2 {
            continue;
        }

        let stride = (values.len() / MAX_SPLIT_CANDIDATES).max(1);
        for pair in values.windows(2).step_by(stride) {
            let threshold = (pair[0] + pair[1]) / 2.0;

            let (mut left_sum, mut left_n, mut right_sum, mut right_n) = (0.0, 0usize, 0.0, 0usize);
            for (xi, &r) in x.iter().zip(residuals.iter()) {
                if xi[feature] < threshold {
                    left_sum += r;
                    left_n += 1;
                } else {
                    right_sum += r;
                    right_n += 1;
                }
            }
            if left_n == 0 || right_n == 0 {
                continue;
            }
            let left_value = left_sum / left_n as f64;
            let right_value = right_sum / right_n as f64;

            let sse: f64 = x
                .iter()
                .zip(residuals.iter())
                .map(|(xi, &r)| {
                    let fitted = if xi[feature] < threshold {
                        left_value
                    } else {
                        right_value
                    };
                    (r - fitted) * (r - fitted)
                })
                .sum();

            if sse < baseline && best.as_ref().map_or(true, |(best_sse, _)| sse < *best_sse) {
                best = Some((
                    sse,
                    Stump {
                        feature,
                        threshold,
                        left_value,
                        right_value,
                    },
                ));
            }
        }
    }

    best.map(|(_, stump)| stump)
}

// ===== Evaluation =====

struct Evaluation {
    rmse: f64,
    mae: f64,
    r2: f64,
}

fn evaluate<P: Predictor>(model: &P, x: &[[f64; Features::COUNT]], y: &[f64]) -> Evaluation {
    let predictions: Vec<f64> = x
        .iter()
        .map(|xi| model.predict(&Features::from_array(*xi)))
        .collect();

    let n = y.len() as f64;
    let sse: f64 = predictions
        .iter()
        .zip(y.iter())
        .map(|(p, t)| (p - t) * (p - t))
        .sum();
    let mae = predictions
        .iter()
        .zip(y.iter())
        .map(|(p, t)| (p - t).abs())
        .sum::<f64>()
        / n;

    let y_mean = mean(y);
    let total: f64 = y.iter().map(|t| (t - y_mean) * (t - y_mean)).sum();
    let r2 = if total > 0.0 { 1.0 - sse / total } else { 0.0 };

    Evaluation {
        rmse: (sse / n).sqrt(),
        mae,
        r2,
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
