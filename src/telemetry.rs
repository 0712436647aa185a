use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{trace as sdktrace, Resource};
use opentelemetry_semantic_conventions::resource;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the global tracing subscriber.
///
/// `RUST_LOG_FORMAT=json` switches to flattened JSON events for log
/// shippers; an OTLP span exporter is attached only when
/// `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
pub fn init_telemetry(service_name: &str) {
    // sqlx/sea_orm statement logs drown everything at info level
    let env_filter = EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
        "info,caninecare_server=info,sqlx=warn,sea_orm=warn".to_string()
    }));

    let fmt_layer = match std::env::var("RUST_LOG_FORMAT").as_deref() {
        Ok("json") => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .without_time()
            .boxed(),
        _ => tracing_subscriber::fmt::layer().boxed(),
    };

    let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .ok()
        .map(|endpoint| {
            let tracer = opentelemetry_otlp::new_pipeline()
                .tracing()
                .with_exporter(
                    opentelemetry_otlp::new_exporter()
                        .tonic()
                        .with_endpoint(endpoint),
                )
                .with_trace_config(
                    sdktrace::config()
                        .with_resource(Resource::new(vec![KeyValue::new(
                            resource::SERVICE_NAME,
                            service_name.to_string(),
                        )]))
                        .with_sampler(sdktrace::Sampler::AlwaysOn),
                )
                .install_batch(opentelemetry_sdk::runtime::Tokio)
                .expect("failed to install OpenTelemetry tracer");

            tracing_opentelemetry::layer().with_tracer(tracer)
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(otel_layer)
        .with(fmt_layer)
        .init();
}
