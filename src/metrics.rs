//! Prometheus exposition endpoint.
//!
//! This module turns a [`prometheus::Registry`] into a request handler that
//! gathers the registered collectors and returns them in Prometheus text format.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, MethodRouter},
};
use prometheus::{Encoder, Registry, TextEncoder};
use std::time::Instant;
use tracing::{debug, error};

/// Initial buffer capacity for metrics encoding.
const BUFFER_CAP: usize = 64 * 1024;

/// Error type for metrics endpoint failures.
#[derive(Debug)]
pub enum MetricsError {
    EncodingFailed,
}

impl IntoResponse for MetricsError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to encode metrics",
        )
            .into_response()
    }
}

/// Gathers and encodes every metric family in `registry`.
pub fn encode_registry(registry: &Registry) -> Result<Response, MetricsError> {
    let start = Instant::now();
    let families = registry.gather();

    let mut buffer = Vec::with_capacity(BUFFER_CAP);
    let encoder = TextEncoder::new();

    if let Err(e) = encoder.encode(&families, &mut buffer) {
        error!("Failed to encode Prometheus metrics: {}", e);
        return Err(MetricsError::EncodingFailed);
    }

    debug!(
        "Encoded {} metric families, {} bytes, {:.3}ms",
        families.len(),
        buffer.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok((
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        buffer,
    )
        .into_response())
}

/// Builds the handler serving `registry` for every request method.
pub fn metrics_endpoint(registry: Registry) -> MethodRouter {
    any(move || {
        let registry = registry.clone();
        async move { encode_registry(&registry) }
    })
}
