//! Server construction and adapter wiring.
//!
//! Chooses the persistence adapters from configuration: a configured
//! `DATABASE_URL` selects the Diesel/PostgreSQL adapters, otherwise the
//! in-memory stores back the API (development and tests).

mod config;

pub use config::{ConfigError, ServerConfig};

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tracing::{info, warn};

use crate::domain::{AuthService, EventLifecycleService};
use crate::inbound::http;
use crate::inbound::http::health::{self, HealthState};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryCredentialStore, InMemoryEventRepository};
use crate::outbound::persistence::{
    DbPool, DieselCredentialStore, DieselEventRepository, PoolConfig,
};

/// Build the HTTP state from configuration, choosing adapters.
async fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let clock = Arc::new(DefaultClock);
    match config.database_url() {
        Some(url) => {
            let pool = DbPool::connect(PoolConfig::new(url))
                .await
                .map_err(std::io::Error::other)?;
            let credentials = Arc::new(DieselCredentialStore::new(pool.clone()));
            let events = Arc::new(DieselEventRepository::new(pool));
            Ok(HttpState::new(
                Arc::new(AuthService::new(credentials)),
                Arc::new(EventLifecycleService::new(events, clock)),
            ))
        }
        None => {
            warn!("no DATABASE_URL configured; using in-memory stores");
            let credentials = Arc::new(InMemoryCredentialStore::default());
            let events = Arc::new(InMemoryEventRepository::default());
            Ok(HttpState::new(
                Arc::new(AuthService::new(credentials)),
                Arc::new(EventLifecycleService::new(events, clock)),
            ))
        }
    }
}

/// Assemble the application: API routes plus health probes.
pub fn build_app(
    state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .app_data(health_state)
        .service(http::api_scope())
        .service(health::ready)
        .service(health::live)
}

/// Bind and serve until shutdown.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let state = web::Data::new(build_http_state(&config).await?);
    let health_state = web::Data::new(HealthState::new());

    let server_health = health_state.clone();
    let server = HttpServer::new(move || build_app(state.clone(), server_health.clone()))
        .bind(config.bind_addr())?;

    info!(addr = %config.bind_addr(), "listening");
    let server = server.run();
    health_state.mark_ready();
    server.await
}
