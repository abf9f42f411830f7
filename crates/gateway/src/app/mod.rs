//! HTTP application wiring for the gateway.
//!
//! - `routes/`: one file per resource, mirroring the server's paths
//! - `input.rs`: body and query checks run before forwarding
//! - `errors.rs`: gateway-side error responses

use std::sync::Arc;

use axum::http::Uri;
use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use shareit_core::{Clock, DateTimeFormat, SystemClock};
use shareit_infra::GatewayConfig;

use crate::client::ServerClient;
use crate::middleware;

pub mod errors;
pub mod input;
pub mod routes;

/// What every gateway handler needs: the upstream client and the clock used
/// for booking date checks.
pub struct Gateway {
    pub client: ServerClient,
    pub clock: Arc<dyn Clock>,
    pub format: DateTimeFormat,
}

/// Build the gateway router from configuration (entrypoint used by `main.rs`).
pub fn build_app(config: &GatewayConfig) -> Result<Router, reqwest::Error> {
    let client = ServerClient::new(config.server_url.as_str())?;
    let clock = Arc::new(SystemClock::new(config.datetime.clone()));
    Ok(build_app_with(client, clock, config.datetime.clone()))
}

pub fn build_app_with(client: ServerClient, clock: Arc<dyn Clock>, format: DateTimeFormat) -> Router {
    let gateway = Arc::new(Gateway { client, clock, format });

    let protected = routes::router().layer(axum::middleware::from_fn(middleware::sharer_middleware));

    Router::new()
        .route("/health", get(routes::health))
        .nest("/users", routes::users::router())
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(gateway)))
}

/// Path and query of the incoming call, forwarded unchanged.
pub(crate) fn target(uri: &Uri) -> &str {
    uri.path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path())
}
