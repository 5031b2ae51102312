//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener and stop on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::caching::EtagGenerator;
use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::request::{make_request_span, UuidRequestId, X_REQUEST_ID};
use crate::lifecycle::{ServiceState, Shutdown};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ServiceState>,
    pub etags: EtagGenerator,
}

impl AppState {
    pub fn new(service: Arc<ServiceState>, etags: EtagGenerator) -> Self {
        Self { service, etags }
    }
}

/// HTTP server for the configuration service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &ServiceConfig, service: Arc<ServiceState>) -> Self {
        let state = AppState::new(service, EtagGenerator::new(config.tree.etag_salt.clone()));
        let router = build_router(state, config.timeouts.request());
        Self { router }
    }

    /// The fully layered router, e.g. for in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` triggers.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut stop = shutdown.subscribe();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = stop.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/tree", get(handlers::tree_root))
        .route("/tree/", get(handlers::tree_root))
        .route("/tree/{*path}", get(handlers::tree_path))
        .route("/status", get(handlers::status))
        .route("/version", get(handlers::version))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
                .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                .layer(TimeoutLayer::new(request_timeout)),
        )
}
