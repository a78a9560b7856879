//! Internal Server Example using axum
//!
//! This example demonstrates how to expose health checks, Prometheus metrics
//! and a custom endpoint on an internal port.
//!
//! # Running the example
//!
//! ```bash
//! cargo run --example internal_server -- [config.yaml]
//! ```
//!
//! Then open the index page:
//! ```bash
//! curl http://localhost:8081/
//! ```

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use internal_server::{Config, EndpointRegistry};
use prometheus::{IntCounterVec, Opts, Registry};
use std::net::SocketAddr;
use tokio::{net::TcpListener, signal};
use tracing::{info, Level};

/// Static probe: always live, ready once the server is listening.
///
/// Only the configured liveness and readiness paths are routed here, so the
/// request path is not inspected.
async fn healthchecks() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn count_requests(requests: IntCounterVec, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    requests
        .with_label_values(&[path.as_str(), response.status().as_str()])
        .inc();
    response
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
    }
    info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let registry = Registry::new();
    let requests = IntCounterVec::new(
        Opts::new(
            "internal_http_requests_total",
            "Requests served by the internal server",
        ),
        &["path", "code"],
    )?;
    registry.register(Box::new(requests.clone()))?;

    let mut endpoints = EndpointRegistry::with_config(config)?
        .with_healthchecks(healthchecks)
        .with_prometheus_registry(registry);
    endpoints.add_endpoint("/version", "Exposes the build version", || async {
        env!("CARGO_PKG_VERSION")
    })?;

    let app = endpoints
        .into_router()
        .layer(middleware::from_fn(move |request: Request, next: Next| {
            count_requests(requests.clone(), request, next)
        }));

    let addr: SocketAddr = "127.0.0.1:8081".parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("internal server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("internal server stopped gracefully");
    Ok(())
}
