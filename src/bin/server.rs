use std::sync::Arc;

use axum::routing::get;
use caninecare_server::{
    api, config::AppConfig, fertility::FertilityService, metrics, state::MonitorState, store,
    telemetry,
};

#[tokio::main]
async fn main() {
    // Load .env if present (dotenvy)
    dotenvy::dotenv().ok();

    telemetry::init_telemetry("caninecare-server");

    let config = Arc::new(AppConfig::from_env());

    let (prometheus_layer, metric_handle) = axum_prometheus::PrometheusMetricLayer::pair();

    // Regression models are optional at startup; without them the fertility
    // endpoint reports service unavailable and the breed list is empty.
    let models = match FertilityService::load(&config.model_dir) {
        Ok(service) => {
            tracing::info!("ML models loaded from {}", config.model_dir.display());
            Some(Arc::new(service))
        }
        Err(e) => {
            tracing::warn!("ML models not loaded: {}", e);
            None
        }
    };

    let store = store::connect(config.database_url.as_deref()).await;
    metrics::init_metrics(store.as_ref()).await;

    let state = MonitorState::new(&config);

    let app = api::create_app(config.clone(), state, store, models)
        .layer(prometheus_layer)
        .route("/metrics", get(|| async move { metric_handle.render() }));

    tracing::info!("listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
