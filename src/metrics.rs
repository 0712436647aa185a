use crate::store::ProfileStore;

/// Seed gauges from the durable mirror at startup so dashboards do not
/// start from zero after every restart.
pub async fn init_metrics(store: &dyn ProfileStore) {
    let profile_count = store.list_profiles().await.map(|p| p.len()).unwrap_or(0);
    metrics::gauge!("caninecare_profiles_total").set(profile_count as f64);

    tracing::info!("Initialized metrics: Profiles={}", profile_count);
}

pub fn record_reading() {
    metrics::counter!("caninecare_sensor_readings_total").increment(1);
}

pub fn record_alert(category: &str, severity: &str) {
    metrics::counter!(
        "caninecare_alerts_total",
        "category" => category.to_string(),
        "severity" => severity.to_string()
    )
    .increment(1);
}

pub fn record_prediction(kind: &str) {
    metrics::counter!("caninecare_predictions_total", "kind" => kind.to_string()).increment(1);
}

pub fn record_mirror_failure(operation: &'static str) {
    metrics::counter!("caninecare_mirror_failures_total", "operation" => operation).increment(1);
}

pub fn set_profiles_total(count: usize) {
    metrics::gauge!("caninecare_profiles_total").set(count as f64);
}
