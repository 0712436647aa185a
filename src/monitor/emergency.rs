use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::monitor::Severity;

/// Overall emergency urgency: `none < high < critical`.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EmergencyLevel {
    None,
    High,
    Critical,
}

impl EmergencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmergencyLevel::None => "none",
            EmergencyLevel::High => "high",
            EmergencyLevel::Critical => "critical",
        }
    }

    /// Alert-record severity for a triggered emergency.
    pub fn to_severity(self) -> Severity {
        match self {
            EmergencyLevel::Critical => Severity::Critical,
            _ => Severity::High,
        }
    }
}

/// One triggered emergency condition with its recommended action.
#[derive(Debug, Clone, Serialize)]
pub struct EmergencyCondition {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: String,
    pub action: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmergencyAssessment {
    pub emergency_level: EmergencyLevel,
    pub emergencies: Vec<EmergencyCondition>,
}

/// Evaluate the four emergency conditions independently. Conditions may
/// co-occur and all triggered ones are reported; the overall level is the
/// maximum across them.
pub fn detect(
    th: &Thresholds,
    temperature: f64,
    activity_percent: f64,
    immobile_duration_secs: u64,
) -> EmergencyAssessment {
    let mut emergencies = Vec::new();
    let mut level = EmergencyLevel::None;

    if temperature >= th.temp_critical_high {
        emergencies.push(EmergencyCondition {
            kind: "Critical Fever",
            message: format!("Temperature critically high: {}°C", temperature),
            action: "IMMEDIATE VETERINARY CARE REQUIRED",
        });
        level = level.max(EmergencyLevel::Critical);
    }

    if temperature <= th.temp_critical_low {
        emergencies.push(EmergencyCondition {
            kind: "Severe Hypothermia",
            message: format!("Temperature critically low: {}°C", temperature),
            action: "IMMEDIATE VETERINARY CARE REQUIRED",
        });
        level = level.max(EmergencyLevel::Critical);
    }

    if immobile_duration_secs >= th.immobility_duration_secs {
        emergencies.push(EmergencyCondition {
            kind: "Prolonged Immobility",
            message: format!(
                "No movement for {:.0} minutes",
                immobile_duration_secs as f64 / 60.0
            ),
            action: "Check dog immediately - possible injury or illness",
        });
        level = level.max(EmergencyLevel::High);
    }

    if temperature >= th.temp_fever && activity_percent < 15.0 {
        emergencies.push(EmergencyCondition {
            kind: "Fever + Lethargy",
            message: "Dog has fever and is extremely lethargic".to_string(),
            action: "Contact veterinarian urgently",
        });
        level = level.max(EmergencyLevel::High);
    }

    EmergencyAssessment {
        emergency_level: level,
        emergencies,
    }
}
