use serde::Serialize;

/// Outcome of a behavior-pattern classification.
#[derive(Debug, Clone, Serialize)]
pub struct BehaviorAssessment {
    pub behavior_type: String,
    pub alerts: Vec<String>,
    pub stress_level: String,
}

/// Classify an activity reading into one of five fixed bands and scan the
/// most recent buffered samples for erratic swings.
///
/// `recent_activity` is the activity percent of the last few sensor samples,
/// oldest first; the erratic check needs at least three.
///
/// The stress label intentionally uses its own thresholds, which disagree
/// with the band boundaries (e.g. 15% is "Low Activity" behavior but
/// "Low (Possible Depression)" stress). Both are kept as independent fields.
pub fn classify(activity_percent: f64, recent_activity: &[f64]) -> BehaviorAssessment {
    let mut alerts = Vec::new();

    let behavior_type = if activity_percent < 10.0 {
        "Sleeping/Resting"
    } else if activity_percent < 30.0 {
        alerts.push("Possible lethargy or fatigue".to_string());
        "Low Activity"
    } else if activity_percent < 60.0 {
        "Normal Activity"
    } else if activity_percent < 80.0 {
        "High Activity"
    } else {
        alerts.push("Possible stress, anxiety, or excitement".to_string());
        "Hyperactive"
    };

    if recent_activity.len() >= 3 {
        let window = &recent_activity[recent_activity.len() - 3..];
        if std_deviation(window) > 30.0 {
            alerts.push("Erratic behavior pattern detected".to_string());
        }
    }

    BehaviorAssessment {
        behavior_type: behavior_type.to_string(),
        alerts,
        stress_level: stress_level(activity_percent).to_string(),
    }
}

fn stress_level(activity_percent: f64) -> &'static str {
    if activity_percent > 80.0 {
        "High"
    } else if activity_percent > 60.0 {
        "Moderate"
    } else if activity_percent < 20.0 {
        "Low (Possible Depression)"
    } else {
        "Normal"
    }
}

/// Population standard deviation.
fn std_deviation(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
