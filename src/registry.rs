//! Endpoint registry for the internal diagnostics handler.
//!
//! An [`EndpointRegistry`] collects the endpoints served next to the index
//! page. It is built once during startup and then frozen into an
//! [`InternalHandler`] for serving; nothing can be registered afterwards.
//!
//! # Usage
//!
//! ```rust
//! use internal_server::EndpointRegistry;
//! use prometheus::Registry;
//!
//! let mut registry = EndpointRegistry::new()
//!     .with_healthchecks(|| async { "ok" })
//!     .with_prometheus_registry(Registry::new());
//!
//! registry
//!     .add_endpoint("/version", "Build version", || async { env!("CARGO_PKG_VERSION") })
//!     .unwrap();
//!
//! let paths: Vec<&str> = registry.endpoints().map(|(path, _)| path).collect();
//! assert_eq!(paths, ["/live", "/metrics", "/ready", "/version"]);
//!
//! let app = registry.into_router();
//! # drop(app);
//! ```

use axum::{
    extract::Request,
    handler::Handler,
    response::IntoResponse,
    routing::{any, any_service, MethodRouter},
    Router,
};
use prometheus::Registry;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use thiserror::Error;
use tower::Service;
use tracing::{debug, warn};

use crate::config::{Config, ConfigError};
use crate::handler::InternalHandler;
use crate::metrics::metrics_endpoint;

pub const LIVE_DESCRIPTION: &str = "Exposes liveness checks";
pub const READY_DESCRIPTION: &str = "Exposes readiness checks";
pub const METRICS_DESCRIPTION: &str = "Exposes Prometheus metrics";

/// Errors returned while registering endpoints.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("endpoint path must not be empty")]
    EmptyPath,
}

/// A registered endpoint: its index description and the handler serving it.
#[derive(Clone)]
pub(crate) struct Endpoint {
    pub(crate) description: String,
    pub(crate) handler: MethodRouter,
}

/// Mutable collection of endpoints, used during setup.
pub struct EndpointRegistry {
    config: Config,
    endpoints: BTreeMap<String, Endpoint>,
}

impl Default for EndpointRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EndpointRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointRegistry")
            .field("title", &self.config.title)
            .field("endpoints", &self.endpoints.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl EndpointRegistry {
    /// Creates an empty registry with the default paths and title.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            endpoints: BTreeMap::new(),
        }
    }

    /// Creates an empty registry using the paths and title from `config`.
    pub fn with_config(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            endpoints: BTreeMap::new(),
        })
    }

    /// Serves liveness and readiness checks through `handler`.
    ///
    /// The same handler answers both paths; it can tell them apart by the
    /// request URI, which is passed through unchanged.
    pub fn with_healthchecks<H, T>(self, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.with_healthcheck_router(any(handler))
    }

    /// Like [`with_healthchecks`](Self::with_healthchecks), for a tower service.
    pub fn with_healthchecks_service<S>(self, service: S) -> Self
    where
        S: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        S::Response: IntoResponse + 'static,
        S::Future: Send + 'static,
    {
        self.with_healthcheck_router(any_service(service))
    }

    fn with_healthcheck_router(mut self, handler: MethodRouter) -> Self {
        let live = self.config.live_path.clone();
        let ready = self.config.ready_path.clone();
        self.insert(live, LIVE_DESCRIPTION.to_string(), handler.clone());
        self.insert(ready, READY_DESCRIPTION.to_string(), handler);
        self
    }

    /// Serves the metrics gathered from `registry` in Prometheus text format.
    pub fn with_prometheus_registry(mut self, registry: Registry) -> Self {
        let path = self.config.metrics_path.clone();
        self.insert(
            path,
            METRICS_DESCRIPTION.to_string(),
            metrics_endpoint(registry),
        );
        self
    }

    /// Adds or replaces the endpoint at `path` and lists it on the index page.
    pub fn add_endpoint<H, T>(
        &mut self,
        path: impl Into<String>,
        description: impl Into<String>,
        handler: H,
    ) -> Result<&mut Self, RegistryError>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        let path = non_empty(path.into())?;
        self.insert(path, description.into(), any(handler));
        Ok(self)
    }

    /// Like [`add_endpoint`](Self::add_endpoint), for a tower service.
    pub fn add_endpoint_service<S>(
        &mut self,
        path: impl Into<String>,
        description: impl Into<String>,
        service: S,
    ) -> Result<&mut Self, RegistryError>
    where
        S: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        S::Response: IntoResponse + 'static,
        S::Future: Send + 'static,
    {
        let path = non_empty(path.into())?;
        self.insert(path, description.into(), any_service(service));
        Ok(self)
    }

    fn insert(&mut self, path: String, description: String, handler: MethodRouter) {
        if self.endpoints.contains_key(&path) {
            warn!("Replacing endpoint already registered at {}", path);
        } else {
            debug!("Registered endpoint {} - {}", path, description);
        }
        self.endpoints.insert(
            path,
            Endpoint {
                description,
                handler,
            },
        );
    }

    /// Registered `(path, description)` pairs in ascending path order.
    pub fn endpoints(&self) -> impl Iterator<Item = (&str, &str)> {
        self.endpoints
            .iter()
            .map(|(path, endpoint)| (path.as_str(), endpoint.description.as_str()))
    }

    /// Returns true if an endpoint is registered at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.endpoints.contains_key(path)
    }

    /// Number of registered endpoints, not counting the index page.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Freezes the registry into a handler ready to serve requests.
    pub fn into_handler(self) -> InternalHandler {
        debug!(
            "Serving {} internal endpoints: {:?}",
            self.endpoints.len(),
            self.endpoints.keys().collect::<Vec<_>>()
        );
        InternalHandler::new(self.config.title, self.endpoints)
    }

    /// Freezes the registry into an [`axum::Router`] that sends every request
    /// to the resulting [`InternalHandler`].
    pub fn into_router(self) -> Router {
        Router::new().fallback_service(self.into_handler())
    }
}

fn non_empty(path: String) -> Result<String, RegistryError> {
    if path.is_empty() {
        return Err(RegistryError::EmptyPath);
    }
    Ok(path)
}
