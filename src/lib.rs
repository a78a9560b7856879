//! Internal diagnostics HTTP handler.
//!
//! This library bundles the endpoints a service exposes on its internal port
//! (liveness and readiness probes, Prometheus metrics and any custom
//! diagnostics) behind a single handler that also renders an index page
//! linking to every one of them.
//!
//! # Features
//!
//! - **Health Checks**: `/live` and `/ready` delegate to a caller-supplied handler
//! - **Prometheus Metrics**: `/metrics` exposes a `prometheus::Registry` in text format
//! - **Custom Endpoints**: any axum handler or tower service can be added with a description
//! - **Index Page**: `/` lists all endpoints as links, sorted by path
//!
//! # Usage
//!
//! ```rust
//! use internal_server::EndpointRegistry;
//! use prometheus::Registry;
//!
//! let metrics = Registry::new();
//!
//! // Configure the built-in endpoints
//! let mut registry = EndpointRegistry::new()
//!     .with_healthchecks(|| async { "ok" })
//!     .with_prometheus_registry(metrics);
//!
//! // Add a custom endpoint; it shows up on the index page
//! registry
//!     .add_endpoint("/foo", "My other signal to expose internally", || async {})
//!     .unwrap();
//!
//! // Freeze it into an axum router
//! let app = registry.into_router();
//! # drop(app);
//! ```
//!
//! The router can be served with `axum::serve` on whatever listener the
//! caller owns.

pub mod config;
pub mod handler;
pub mod index;
pub mod metrics;
pub mod registry;

// Re-export main types for convenience
pub use config::{Config, ConfigError};
pub use handler::InternalHandler;
pub use registry::{EndpointRegistry, RegistryError};
