//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services/`: business operations, one file per resource
//! - `routes/`: HTTP handlers (one file per resource)
//! - `dto.rs`: request/response DTOs and query parsing
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use shareit_core::{Clock, DateTimeFormat, SystemClock};
use shareit_infra::{InMemoryStore, PostgresStore, ServerConfig, Store, StoreBackend, StoreError};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router from configuration (entrypoint used by `main.rs`).
pub async fn build_app(config: &ServerConfig) -> Result<Router, StoreError> {
    let store: Arc<dyn Store> = match &config.store {
        StoreBackend::InMemory => {
            tracing::info!("using in-memory store");
            Arc::new(InMemoryStore::new())
        }
        StoreBackend::Postgres { url, max_connections } => {
            tracing::info!(max_connections, "using postgres store");
            Arc::new(PostgresStore::connect(url, *max_connections).await?)
        }
    };
    let clock = Arc::new(SystemClock::new(config.datetime.clone()));

    Ok(build_app_with(store, clock, config.datetime.clone()))
}

/// Router over explicit collaborators; tests pass a manual clock here.
pub fn build_app_with(store: Arc<dyn Store>, clock: Arc<dyn Clock>, format: DateTimeFormat) -> Router {
    let services = Arc::new(services::AppServices::new(store, clock, format));

    // Protected routes: require the sharer header.
    let protected = routes::router().layer(axum::middleware::from_fn(middleware::sharer_middleware));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/users", routes::users::router())
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
