mod auth;
mod routes;
mod state;

use actix_web::{web, App, HttpServer};
use attend_config::{GeofenceConfig, ServiceConfig, SessionConfig, StorageBackend};
use attend_observability::{init, log_startup, ObservabilityConfig};
use attend_storage_memory::MemoryStore;
use attend_storage_postgres::{PostgresConfig, PostgresStore};
use std::io;

use crate::state::AppState;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = ServiceConfig::from_env("attend-api");
    let obs_config = ObservabilityConfig {
        service_name: config.service_name.clone(),
        environment: config.environment.to_string(),
        log_level: config.log_level.clone(),
        metrics_addr: config.metrics_addr.clone(),
    };
    let handle = init(&obs_config);
    log_startup(&handle, &obs_config.environment);

    let geofence = GeofenceConfig::from_env();
    let session_config = SessionConfig::from_env();
    if session_config.issuer_token.is_none() {
        tracing::warn!("ATTEND_SESSION_ISSUER_TOKEN not set, session issuing is disabled");
    }
    tracing::info!(
        default_radius_m = geofence.default_radius.meters(),
        missing_reference = ?geofence.missing_reference,
        coordinate_policy = %geofence.coordinate_policy,
        storage = ?config.storage,
        "geofence configured"
    );

    let state = match config.storage {
        StorageBackend::Memory => {
            AppState::new(config.clone(), session_config, geofence, MemoryStore::new())
        }
        StorageBackend::Postgres => {
            let store = PostgresStore::connect(&PostgresConfig::from_env())
                .await
                .map_err(io::Error::other)?;
            AppState::new(config.clone(), session_config, geofence, store)
        }
    };

    let bind_addr = config.bind_addr.clone();
    let shared_state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .app_data(shared_state.clone())
            .configure(routes::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
