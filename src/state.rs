use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::fertility::FertilityPrediction;
use crate::monitor::Severity;

/// One recorded telemetry sample, immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub dog_name: String,
    pub temperature: f64,
    pub activity_percent: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    Health,
    Geofence,
    Emergency,
}

impl AlertCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCategory::Health => "health",
            AlertCategory::Geofence => "geofence",
            AlertCategory::Emergency => "emergency",
        }
    }
}

/// One entry in the alert history buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRecord {
    pub dog_name: String,
    pub category: AlertCategory,
    pub severity: Severity,
    pub messages: Vec<String>,
    pub timestamp: NaiveDateTime,
}

/// Latest known profile for a dog, keyed by exact name (case-sensitive).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DogProfile {
    pub name: String,
    pub breed: String,
    pub age_months: i32,
    pub weight_kg: f64,
    pub last_updated: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_prediction: Option<FertilityPrediction>,
}

/// Fixed-capacity FIFO. Appending beyond capacity evicts the oldest entry.
#[derive(Debug)]
pub struct BoundedBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Newest `n` entries in append order (oldest of the window first).
    pub fn tail(&self, n: usize) -> Vec<T>
    where
        T: Clone,
    {
        let skip = self.items.len().saturating_sub(n);
        self.items.iter().skip(skip).cloned().collect()
    }
}

/// Process-wide mutable state, owned explicitly and injected into handlers.
///
/// The two history buffers and the profile map are the only shared mutable
/// state in the service; no ordering guarantee beyond append order is needed.
pub struct MonitorState {
    sensor_history: RwLock<BoundedBuffer<TelemetrySample>>,
    alert_history: RwLock<BoundedBuffer<AlertRecord>>,
    profiles: RwLock<HashMap<String, DogProfile>>,
}

impl MonitorState {
    pub fn new(config: &AppConfig) -> Arc<Self> {
        Arc::new(Self {
            sensor_history: RwLock::new(BoundedBuffer::new(config.sensor_buffer_capacity)),
            alert_history: RwLock::new(BoundedBuffer::new(config.alert_history_capacity)),
            profiles: RwLock::new(HashMap::new()),
        })
    }

    pub async fn record_sample(&self, sample: TelemetrySample) {
        self.sensor_history.write().await.push(sample);
        crate::metrics::record_reading();
    }

    pub async fn record_alert(&self, alert: AlertRecord) {
        crate::metrics::record_alert(alert.category.as_str(), alert.severity.as_str());
        self.alert_history.write().await.push(alert);
    }

    pub async fn recent_samples(&self, n: usize) -> Vec<TelemetrySample> {
        self.sensor_history.read().await.tail(n)
    }

    pub async fn recent_alerts(&self, n: usize) -> Vec<AlertRecord> {
        self.alert_history.read().await.tail(n)
    }

    pub async fn upsert_profile(&self, profile: DogProfile) {
        self.profiles
            .write()
            .await
            .insert(profile.name.clone(), profile);
    }

    /// Merge new profile fields over an existing entry, keeping the latest
    /// prediction if one was already recorded.
    pub async fn merge_profile(&self, mut profile: DogProfile) -> DogProfile {
        let mut profiles = self.profiles.write().await;
        if let Some(existing) = profiles.get(&profile.name) {
            profile.latest_prediction = profile
                .latest_prediction
                .take()
                .or_else(|| existing.latest_prediction.clone());
        }
        profiles.insert(profile.name.clone(), profile.clone());
        profile
    }

    pub async fn get_profile(&self, name: &str) -> Option<DogProfile> {
        self.profiles.read().await.get(name).cloned()
    }

    pub async fn all_profiles(&self) -> Vec<DogProfile> {
        self.profiles.read().await.values().cloned().collect()
    }

    pub async fn profile_count(&self) -> usize {
        self.profiles.read().await.len()
    }

    /// Counts and running averages for the statistics endpoint.
    pub async fn statistics(&self) -> StateStatistics {
        let sensors = self.sensor_history.read().await;
        let (mut temp_sum, mut activity_sum) = (0.0, 0.0);
        for sample in sensors.iter() {
            temp_sum += sample.temperature;
            activity_sum += sample.activity_percent;
        }
        let count = sensors.len();
        let (average_temperature, average_activity) = if count > 0 {
            (temp_sum / count as f64, activity_sum / count as f64)
        } else {
            (0.0, 0.0)
        };

        StateStatistics {
            total_readings: count,
            total_alerts: self.alert_history.read().await.len(),
            total_dogs_monitored: self.profiles.read().await.len(),
            average_temperature,
            average_activity,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StateStatistics {
    pub total_readings: usize,
    pub total_alerts: usize,
    pub total_dogs_monitored: usize,
    pub average_temperature: f64,
    pub average_activity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_evicts_oldest_at_capacity() {
        let mut buf = BoundedBuffer::new(3);
        for i in 0..4 {
            buf.push(i);
        }
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn buffer_never_exceeds_capacity() {
        let mut buf = BoundedBuffer::new(5);
        for i in 0..100 {
            buf.push(i);
            assert!(buf.len() <= 5);
        }
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![95, 96, 97, 98, 99]);
    }

    #[test]
    fn tail_returns_newest_in_append_order() {
        let mut buf = BoundedBuffer::new(10);
        for i in 0..6 {
            buf.push(i);
        }
        assert_eq!(buf.tail(3), vec![3, 4, 5]);
        assert_eq!(buf.tail(100).len(), 6);
    }

    #[tokio::test]
    async fn profile_merge_keeps_latest_prediction() {
        use crate::fertility::{PredictionKind, PredictionUnit};

        let state = MonitorState::new(&AppConfig::default());
        let now = chrono::Utc::now().naive_utc();

        let prediction = FertilityPrediction {
            dog_name: "Bella".to_string(),
            breed: "Beagle".to_string(),
            age_months: 24,
            weight_kg: 12.0,
            prediction_type: PredictionKind::NextHeat,
            prediction_value: 42.0,
            prediction_unit: PredictionUnit::Days,
            estimated_date: now.date(),
            fertility_status: "Normal Cycle".to_string(),
            alert_level: Severity::Low,
            timestamp: now,
        };
        state
            .upsert_profile(DogProfile {
                name: "Bella".to_string(),
                breed: "Beagle".to_string(),
                age_months: 24,
                weight_kg: 12.0,
                last_updated: now,
                latest_prediction: Some(prediction),
            })
            .await;

        // A plain profile update must not wipe a stored prediction.
        let merged = state
            .merge_profile(DogProfile {
                name: "Bella".to_string(),
                breed: "Foxhound".to_string(),
                age_months: 25,
                weight_kg: 12.5,
                last_updated: now,
                latest_prediction: None,
            })
            .await;
        assert_eq!(merged.breed, "Foxhound");
        assert!(merged.latest_prediction.is_some());

        let fetched = state.get_profile("Bella").await.unwrap();
        assert_eq!(fetched.latest_prediction.unwrap().prediction_value, 42.0);
    }

    #[tokio::test]
    async fn profile_keys_are_case_sensitive() {
        let state = MonitorState::new(&AppConfig::default());
        let now = chrono::Utc::now().naive_utc();
        state
            .upsert_profile(DogProfile {
                name: "Rex".to_string(),
                breed: String::new(),
                age_months: 0,
                weight_kg: 0.0,
                last_updated: now,
                latest_prediction: None,
            })
            .await;
        assert!(state.get_profile("Rex").await.is_some());
        assert!(state.get_profile("rex").await.is_none());
    }
}
