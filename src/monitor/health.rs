use serde::{Deserialize, Serialize};

use crate::config::Thresholds;

/// Alert urgency tier. The derive order gives `low < medium < high < critical`,
/// which the rule engine relies on for one-directional promotion.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// Outcome of one health evaluation over a telemetry sample.
#[derive(Debug, Clone, Serialize)]
pub struct HealthAssessment {
    pub health_status: String,
    pub alerts: Vec<String>,
    pub severity: Severity,
    pub recommendations: Vec<String>,
}

/// Evaluate temperature and activity against the threshold bands.
///
/// Temperature rules run in fixed priority order and the first match wins.
/// Activity rules run independently and may only promote severity, never
/// lower it. The combined fever+lethargy rule overrides both.
pub fn evaluate(th: &Thresholds, temperature: f64, activity_percent: f64) -> HealthAssessment {
    let mut health_status = "Normal".to_string();
    let mut alerts = Vec::new();
    let mut severity = Severity::Low;

    // Temperature analysis
    if temperature >= th.temp_critical_high {
        health_status = "Critical Fever".to_string();
        alerts.push(format!(
            "CRITICAL: Temperature {}°C (Normal: {}-{}°C)",
            temperature, th.temp_normal_min, th.temp_normal_max
        ));
        severity = Severity::Critical;
    } else if temperature >= th.temp_fever {
        health_status = "Fever Detected".to_string();
        alerts.push(format!(
            "High temperature: {}°C (Normal: {}-{}°C)",
            temperature, th.temp_normal_min, th.temp_normal_max
        ));
        severity = Severity::High;
    } else if temperature <= th.temp_critical_low {
        health_status = "Critical Hypothermia".to_string();
        alerts.push(format!(
            "CRITICAL: Temperature {}°C (Normal: {}-{}°C)",
            temperature, th.temp_normal_min, th.temp_normal_max
        ));
        severity = Severity::Critical;
    } else if temperature <= th.temp_hypothermia {
        health_status = "Hypothermia Risk".to_string();
        alerts.push(format!(
            "Low temperature: {}°C (Normal: {}-{}°C)",
            temperature, th.temp_normal_min, th.temp_normal_max
        ));
        severity = Severity::High;
    } else if temperature < th.temp_normal_min || temperature > th.temp_normal_max {
        health_status = "Temperature Abnormal".to_string();
        alerts.push(format!("Temperature slightly abnormal: {}°C", temperature));
        severity = Severity::Medium;
    }

    // Activity analysis, independent of the temperature tier
    if activity_percent < th.activity_low {
        if health_status == "Normal" {
            health_status = "Low Activity".to_string();
        }
        alerts.push(format!(
            "Low activity: {}% (Possible lethargy)",
            activity_percent
        ));
        severity = severity.max(Severity::Medium);
    } else if activity_percent > th.activity_high {
        if health_status == "Normal" {
            health_status = "High Activity".to_string();
        }
        alerts.push(format!(
            "High activity: {}% (Possible stress/anxiety)",
            activity_percent
        ));
        severity = severity.max(Severity::Medium);
    }

    // Combined override: fever plus lethargy is always critical
    if temperature >= th.temp_fever && activity_percent < th.activity_low {
        health_status = "Critical: Fever + Lethargy".to_string();
        severity = Severity::Critical;
    }

    HealthAssessment {
        health_status,
        alerts,
        severity,
        recommendations: recommendations(th, temperature, activity_percent),
    }
}

/// Advisory strings per threshold band. Bands are not mutually exclusive;
/// temperature and activity groups may both apply.
fn recommendations(th: &Thresholds, temperature: f64, activity_percent: f64) -> Vec<String> {
    let mut recs: Vec<String> = Vec::new();

    if temperature >= th.temp_critical_high {
        recs.push("EMERGENCY: Contact veterinarian immediately".to_string());
        recs.push("Keep dog hydrated and cool".to_string());
        recs.push("Monitor temperature every 30 minutes".to_string());
    } else if temperature >= th.temp_fever {
        recs.push("Contact veterinarian soon".to_string());
        recs.push("Keep dog hydrated".to_string());
        recs.push("Monitor temperature every 2 hours".to_string());
    } else if temperature <= th.temp_critical_low {
        recs.push("EMERGENCY: Contact veterinarian immediately".to_string());
        recs.push("Warm the dog gradually with blankets".to_string());
        recs.push("Avoid direct heat sources".to_string());
    } else if temperature <= th.temp_hypothermia {
        recs.push("Warm the dog gradually".to_string());
        recs.push("Contact veterinarian".to_string());
    }

    if activity_percent < th.activity_low {
        recs.push("Monitor for signs of pain or discomfort".to_string());
        recs.push("Check for appetite changes".to_string());
        recs.push("Ensure adequate rest".to_string());
    } else if activity_percent > th.activity_high {
        recs.push("Check for stress triggers".to_string());
        recs.push("Provide calming environment".to_string());
        recs.push("Monitor for anxiety symptoms".to_string());
    }

    if recs.is_empty() {
        recs.push("Continue regular monitoring".to_string());
        recs.push("Maintain healthy diet and exercise".to_string());
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn th() -> Thresholds {
        Thresholds::default()
    }

    #[test]
    fn normal_sample_has_no_alerts() {
        let a = evaluate(&th(), 38.5, 65.0);
        assert_eq!(a.health_status, "Normal");
        assert_eq!(a.severity, Severity::Low);
        assert!(a.alerts.is_empty());
        assert_eq!(a.recommendations.len(), 2);
    }

    #[test]
    fn critical_fever_at_and_above_40() {
        for t in [40.0, 40.5, 41.3] {
            let a = evaluate(&th(), t, 50.0);
            assert_eq!(a.severity, Severity::Critical, "temp {t}");
            assert_eq!(a.health_status, "Critical Fever");
        }
    }

    #[test]
    fn fever_band_is_high() {
        let a = evaluate(&th(), 39.5, 50.0);
        assert_eq!(a.health_status, "Fever Detected");
        assert_eq!(a.severity, Severity::High);
    }

    #[test]
    fn hypothermia_bands() {
        assert_eq!(evaluate(&th(), 37.0, 50.0).health_status, "Critical Hypothermia");
        assert_eq!(evaluate(&th(), 37.0, 50.0).severity, Severity::Critical);
        assert_eq!(evaluate(&th(), 37.4, 50.0).health_status, "Hypothermia Risk");
        assert_eq!(evaluate(&th(), 37.4, 50.0).severity, Severity::High);
    }

    #[test]
    fn slightly_abnormal_is_medium() {
        let a = evaluate(&th(), 39.3, 50.0);
        assert_eq!(a.health_status, "Temperature Abnormal");
        assert_eq!(a.severity, Severity::Medium);
    }

    #[test]
    fn low_activity_promotes_but_never_demotes() {
        // Low severity promoted to medium by the activity rule.
        let a = evaluate(&th(), 38.5, 10.0);
        assert_eq!(a.health_status, "Low Activity");
        assert_eq!(a.severity, Severity::Medium);

        // High tier from temperature must survive the activity rule.
        let a = evaluate(&th(), 37.4, 85.0);
        assert_eq!(a.severity, Severity::High);
        assert_eq!(a.alerts.len(), 2);
    }

    #[test]
    fn combined_fever_and_lethargy_overrides() {
        let a = evaluate(&th(), 39.6, 10.0);
        assert_eq!(a.health_status, "Critical: Fever + Lethargy");
        assert_eq!(a.severity, Severity::Critical);
    }

    #[test]
    fn recommendation_bands_stack() {
        // Fever plus low activity contributes both advisory groups.
        let a = evaluate(&th(), 39.6, 10.0);
        assert_eq!(a.recommendations.len(), 6);
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }
}
