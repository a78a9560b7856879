//! Request dispatch for a frozen endpoint registry.

use axum::{
    extract::Request,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Service, ServiceExt};
use tracing::{debug, instrument};

use crate::index::render_index;
use crate::registry::Endpoint;

/// Serves the index page and every registered endpoint.
///
/// Cloning is cheap; all clones share the same endpoint table.
#[derive(Clone)]
pub struct InternalHandler {
    inner: Arc<Inner>,
}

struct Inner {
    title: String,
    endpoints: BTreeMap<String, Endpoint>,
}

impl InternalHandler {
    pub(crate) fn new(title: String, endpoints: BTreeMap<String, Endpoint>) -> Self {
        Self {
            inner: Arc::new(Inner { title, endpoints }),
        }
    }

    /// Registered `(path, description)` pairs in ascending path order.
    pub fn endpoints(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner
            .endpoints
            .iter()
            .map(|(path, endpoint)| (path.as_str(), endpoint.description.as_str()))
    }

    /// Renders the HTML page served at `/`.
    pub fn render_index(&self) -> String {
        render_index(&self.inner.title, self.endpoints())
    }

    /// Dispatches a single request.
    ///
    /// `/` renders the index, registered paths are delegated to their handler
    /// and everything else gets an empty 404.
    #[instrument(skip_all, fields(method = %request.method(), path = %request.uri().path()))]
    pub async fn serve(&self, request: Request) -> Response {
        let path = request.uri().path();
        debug!("Processing {} request", path);

        if path == "/" {
            return Html(self.render_index()).into_response();
        }

        let Some(endpoint) = self.inner.endpoints.get(path) else {
            debug!("No endpoint registered at {}", path);
            return StatusCode::NOT_FOUND.into_response();
        };

        match endpoint.handler.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }
}

impl Service<Request> for InternalHandler {
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let handler = self.clone();
        Box::pin(async move { Ok(handler.serve(request).await) })
    }
}
