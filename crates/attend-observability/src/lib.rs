use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

pub const CHECKINS_TOTAL: &str = "attend_checkins_total";
pub const CHECKOUTS_TOTAL: &str = "attend_checkouts_total";

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub service_name: String,
    pub environment: String,
    pub log_level: String,
    pub metrics_addr: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ObservabilityHandle {
    pub service_name: String,
    pub metrics_enabled: bool,
}

pub fn init(config: &ObservabilityConfig) -> ObservabilityHandle {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);

    let metrics_enabled = init_metrics(config);
    if metrics_enabled {
        describe_metrics();
    }

    ObservabilityHandle {
        service_name: config.service_name.clone(),
        metrics_enabled,
    }
}

pub fn log_startup(handle: &ObservabilityHandle, environment: &str) {
    tracing::info!(
        service = %handle.service_name,
        environment = %environment,
        metrics_enabled = handle.metrics_enabled,
        "attendance service starting"
    );
}

/// Counts a check-in attempt by outcome (`accepted`, `out_of_range`, ...).
pub fn record_checkin(outcome: &'static str) {
    metrics::counter!(CHECKINS_TOTAL, "outcome" => outcome).increment(1);
}

pub fn record_checkout(outcome: &'static str) {
    metrics::counter!(CHECKOUTS_TOTAL, "outcome" => outcome).increment(1);
}

fn describe_metrics() {
    metrics::describe_counter!(CHECKINS_TOTAL, "Attendance check-in attempts by outcome");
    metrics::describe_counter!(CHECKOUTS_TOTAL, "Attendance check-out attempts by outcome");
}

fn init_metrics(config: &ObservabilityConfig) -> bool {
    let Some(addr) = config.metrics_addr.as_ref() else {
        return false;
    };
    let addr: SocketAddr = match addr.parse() {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(
                service = %config.service_name,
                error = %err,
                "Invalid ATTEND_METRICS_ADDR value"
            );
            return false;
        }
    };

    let builder = PrometheusBuilder::new()
        .with_http_listener(addr)
        .add_global_label("service", config.service_name.clone())
        .add_global_label("environment", config.environment.clone());

    match builder.install() {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(
                service = %config.service_name,
                error = %err,
                "Failed to initialize Prometheus exporter"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(metrics_addr: Option<&str>) -> ObservabilityConfig {
        ObservabilityConfig {
            service_name: "attend-test".to_string(),
            environment: "test".to_string(),
            log_level: "not a filter[".to_string(),
            metrics_addr: metrics_addr.map(str::to_string),
        }
    }

    #[test]
    fn metrics_disabled_without_addr() {
        assert!(!init_metrics(&config(None)));
    }

    #[test]
    fn invalid_metrics_addr_disables_metrics() {
        let handle = init(&config(Some("not-an-addr")));
        assert!(!handle.metrics_enabled);
        assert_eq!(handle.service_name, "attend-test");
    }

    #[test]
    fn counters_without_recorder_are_noops() {
        record_checkin("accepted");
        record_checkout("accepted");
    }
}
