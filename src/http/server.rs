//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatch handler as catch-all
//! - Wire up middleware (request ID, tracing, timeout)
//! - Resolve each request against the currently loaded tree
//! - Map resolution outcomes to HTTP responses
//! - Observability (metrics, correlation IDs)

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, Uri},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{DispatchConfig, DispatchSettings};
use crate::http::request::{self, RequestIdMaker};
use crate::http::response;
use crate::observability::metrics;
use crate::routing::{canonical_location, DispatchError, Dispatcher, Resolution};
use crate::security::{Policy, RolePolicy};
use crate::tree::{Handler, Tree};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub tree: Arc<ArcSwap<Tree>>,
    pub settings: Arc<DispatchSettings>,
}

/// HTTP server exposing a tree.
pub struct DispatchServer {
    router: Router,
    tree: Arc<ArcSwap<Tree>>,
}

impl DispatchServer {
    /// Create a new server serving `tree` with the given configuration.
    pub fn new(config: DispatchConfig, tree: Tree) -> Self {
        let tree = Arc::new(ArcSwap::from_pointee(tree));
        let state = AppState {
            tree: tree.clone(),
            settings: Arc::new(config.dispatch.clone()),
        };
        let router = Self::build_router(&config, state);
        Self { router, tree }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &DispatchConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    path = %req.uri().path(),
                    request_id = request::request_id(req.headers()),
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(RequestIdMaker))
    }

    /// Handle to the served tree, for hot reload.
    pub fn tree(&self) -> Arc<ArcSwap<Tree>> {
        self.tree.clone()
    }

    /// Run the server until `shutdown` completes.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: resolve the path and render the outcome.
async fn dispatch_handler(State(state): State<AppState>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    let start = Instant::now();
    let request_id = request::request_id(&headers).to_string();
    let path = uri.path();

    let tree = state.tree.load_full();
    let roles = request::roles(&headers, &state.settings.roles_header);
    let dispatcher = Dispatcher::new(tree.policy(roles));

    let outcome = dispatcher.resolve_path(tree.root(), path);
    let label = match &outcome {
        Ok(_) => "resolved",
        Err(e) => e.outcome(),
    };
    metrics::record_resolution(label, start);

    match outcome {
        Ok(resolution) => {
            tracing::debug!(
                request_id = %request_id,
                handler = %resolution.handler.name,
                remainder = ?resolution.remainder,
                "Resolved"
            );
            response::served(&resolution)
        }
        Err(DispatchError::NonCanonicalPath { handler, remainder }) => {
            non_canonical(&state.settings, dispatcher.policy(), &method, &uri, Resolution { handler, remainder })
        }
        Err(DispatchError::NotFound) => {
            tracing::debug!(request_id = %request_id, path = %path, "No handler resolved");
            response::error(StatusCode::NOT_FOUND, "Not Found")
        }
        Err(DispatchError::Forbidden(e)) => {
            tracing::warn!(request_id = %request_id, path = %path, error = %e, "Access denied");
            response::error(StatusCode::FORBIDDEN, e.to_string())
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, path = %path, error = %e, "Dispatch failed");
            response::error(StatusCode::INTERNAL_SERVER_ERROR, "Dispatch failed")
        }
    }
}

/// An index handler was reached without the trailing slash.
fn non_canonical(
    settings: &DispatchSettings,
    policy: &RolePolicy,
    method: &Method,
    uri: &Uri,
    resolution: Resolution<Handler>,
) -> Response {
    if !settings.force_canonical || resolution.handler.accept_noncanonical {
        return match policy.check(&resolution.handler) {
            Ok(()) => response::served(&resolution),
            Err(e) => response::error(StatusCode::FORBIDDEN, e.to_string()),
        };
    }

    let location = canonical_location(uri.path(), uri.query());
    if *method == Method::POST {
        // Clients drop POST bodies when following redirects.
        tracing::error!(path = %uri.path(), canonical = %location, "POST to non-canonical path");
        return response::error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("POST to '{}' requires a trailing slash; post to '{}' instead", uri.path(), location),
        );
    }

    tracing::debug!(path = %uri.path(), location = %location, "Redirecting to canonical path");
    response::redirect(&location, settings.redirect_status)
}
