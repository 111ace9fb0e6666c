use attend_geo::{CoordinatePolicy, ProximityThreshold};
use serde::{Deserialize, Serialize};
use std::{env, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Local,
    Dev,
    Test,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_env(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "local" => Self::Local,
            "dev" | "development" => Self::Dev,
            "test" | "testing" => Self::Test,
            "staging" => Self::Staging,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Local => "local",
            Self::Dev => "dev",
            Self::Test => "test",
            Self::Staging => "staging",
            Self::Prod => "prod",
        };
        write!(f, "{}", value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    Postgres,
}

impl StorageBackend {
    pub fn from_env(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Self::Postgres,
            _ => Self::Memory,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
    pub environment: Environment,
    pub region: Option<String>,
    pub bind_addr: String,
    pub metrics_addr: Option<String>,
    pub log_level: String,
    pub storage: StorageBackend,
}

impl ServiceConfig {
    pub fn from_env(default_service_name: &str) -> Self {
        let service_name = env_var("ATTEND_SERVICE_NAME", default_service_name.to_string());
        let environment = Environment::from_env(&env_var("ATTEND_ENV", "local".to_string()));
        let region = env::var("ATTEND_REGION").ok();
        let bind_addr = env_var("ATTEND_BIND_ADDR", "0.0.0.0:8080".to_string());
        let metrics_addr = env::var("ATTEND_METRICS_ADDR").ok();
        let log_level = env_var("ATTEND_LOG_LEVEL", "info".to_string());
        let storage = StorageBackend::from_env(&env_var("ATTEND_STORAGE", "memory".to_string()));

        Self {
            service_name,
            environment,
            region,
            bind_addr,
            metrics_addr,
            log_level,
            storage,
        }
    }
}

/// What a check-in does when the office has no reference coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingReferencePolicy {
    #[default]
    Allow,
    Deny,
}

impl MissingReferencePolicy {
    pub fn from_env(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "deny" | "reject" => Self::Deny,
            _ => Self::Allow,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeofenceConfig {
    pub default_radius: ProximityThreshold,
    pub missing_reference: MissingReferencePolicy,
    pub coordinate_policy: CoordinatePolicy,
    pub location_timeout_ms: u64,
}

impl Default for GeofenceConfig {
    fn default() -> Self {
        Self {
            default_radius: ProximityThreshold::DEFAULT,
            missing_reference: MissingReferencePolicy::Allow,
            coordinate_policy: CoordinatePolicy::Reject,
            location_timeout_ms: 10_000,
        }
    }
}

impl GeofenceConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let default_radius = env::var("ATTEND_GEOFENCE_DEFAULT_RADIUS_M")
            .ok()
            .and_then(|value| value.parse::<f64>().ok())
            .and_then(|value| ProximityThreshold::new(value).ok())
            .unwrap_or(defaults.default_radius);
        let missing_reference = env::var("ATTEND_GEOFENCE_MISSING_REFERENCE")
            .map(|value| MissingReferencePolicy::from_env(&value))
            .unwrap_or(defaults.missing_reference);
        let coordinate_policy = env::var("ATTEND_GEOFENCE_COORDINATE_POLICY")
            .ok()
            .and_then(|value| value.parse::<CoordinatePolicy>().ok())
            .unwrap_or(defaults.coordinate_policy);

        Self {
            default_radius,
            missing_reference,
            coordinate_policy,
            location_timeout_ms: env_var_u64(
                "ATTEND_LOCATION_TIMEOUT_MS",
                defaults.location_timeout_ms,
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub issuer_token: Option<String>,
    pub ttl_secs: u64,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self {
            issuer_token: env::var("ATTEND_SESSION_ISSUER_TOKEN")
                .ok()
                .filter(|value| !value.trim().is_empty()),
            ttl_secs: env_var_u64("ATTEND_SESSION_TTL_SECS", 86_400),
        }
    }
}

fn env_var(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

fn env_var_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}
