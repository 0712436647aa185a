use std::net::SocketAddr;
use std::path::PathBuf;

/// Veterinary threshold bands used by the monitoring rules.
///
/// Canine normal body temperature is 38.0–39.2 °C; the fever and hypothermia
/// bands sit just outside it, with the critical bands beyond those.
#[derive(Debug, Clone)]
pub struct Thresholds {
    pub temp_normal_min: f64,
    pub temp_normal_max: f64,
    pub temp_fever: f64,
    pub temp_hypothermia: f64,
    pub temp_critical_high: f64,
    pub temp_critical_low: f64,
    /// Activity percent below which a dog is considered lethargic.
    pub activity_low: f64,
    /// Activity percent above which a dog is considered stressed/hyperactive.
    pub activity_high: f64,
    /// Seconds without movement before an immobility emergency fires.
    pub immobility_duration_secs: u64,
    /// Safe-zone radius in meters when the client does not supply one.
    pub default_safe_zone_radius_m: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temp_normal_min: 38.0,
            temp_normal_max: 39.2,
            temp_fever: 39.5,
            temp_hypothermia: 37.5,
            temp_critical_high: 40.0,
            temp_critical_low: 37.0,
            activity_low: 20.0,
            activity_high: 80.0,
            immobility_duration_secs: 3600,
            default_safe_zone_radius_m: 100.0,
        }
    }
}

/// Process configuration, read from the environment once at startup and
/// immutable afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Allowed CORS origins. A single "*" entry allows any origin.
    pub cors_origins: Vec<String>,
    /// Postgres mirror. `None` selects the no-op store.
    pub database_url: Option<String>,
    /// Directory holding the serialized model artifacts.
    pub model_dir: PathBuf,
    pub sensor_buffer_capacity: usize,
    pub alert_history_capacity: usize,
    pub thresholds: Thresholds,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            cors_origins: vec!["*".to_string()],
            database_url: None,
            model_dir: PathBuf::from("ml/models"),
            sensor_buffer_capacity: 100,
            alert_history_capacity: 200,
            thresholds: Thresholds::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let th = Thresholds {
            temp_normal_min: env_f64("TEMP_NORMAL_MIN", 38.0),
            temp_normal_max: env_f64("TEMP_NORMAL_MAX", 39.2),
            temp_fever: env_f64("TEMP_FEVER", 39.5),
            temp_hypothermia: env_f64("TEMP_HYPOTHERMIA", 37.5),
            temp_critical_high: env_f64("TEMP_CRITICAL_HIGH", 40.0),
            temp_critical_low: env_f64("TEMP_CRITICAL_LOW", 37.0),
            activity_low: env_f64("ACTIVITY_LOW_THRESHOLD", 20.0),
            activity_high: env_f64("ACTIVITY_HIGH_THRESHOLD", 80.0),
            immobility_duration_secs: env_parse("IMMOBILITY_DURATION_SECS", 3600),
            default_safe_zone_radius_m: env_f64("DEFAULT_SAFE_ZONE_RADIUS_M", 100.0),
        };

        Self {
            bind_addr: env_parse("BIND_ADDR", defaults.bind_addr),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            database_url: std::env::var("DATABASE_URL").ok(),
            model_dir: std::env::var("MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),
            sensor_buffer_capacity: env_parse("SENSOR_BUFFER_CAPACITY", 100),
            alert_history_capacity: env_parse("ALERT_HISTORY_CAPACITY", 200),
            thresholds: th,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparseable {}", name);
            default
        }),
        Err(_) => default,
    }
}

fn env_f64(name: &str, default: f64) -> f64 {
    env_parse(name, default)
}
