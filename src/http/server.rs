//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with one route per artifact
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Shut down gracefully on signal

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::artifact::PreparedResponse;
use crate::config::ServerConfig;
use crate::lifecycle::signals;
use crate::lifecycle::MountedArtifact;
use crate::respond::ConditionalRequest;

/// HTTP server exposing prepared artifacts.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `artifacts`.
    pub fn new(config: ServerConfig, artifacts: Vec<MountedArtifact>) -> Self {
        let router = Self::build_router(&config, artifacts);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, artifacts: Vec<MountedArtifact>) -> Router {
        let router = artifacts.into_iter().fold(Router::new(), |router, mounted| {
            // GET routes answer HEAD too; Axum strips any body for HEAD.
            router.route(&mounted.path, get(artifact_handler).with_state(mounted.artifact))
        });

        router
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server until `shutdown` fires or Ctrl+C is received.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown.recv() => tracing::info!("Shutdown requested"),
                    _ = signals::ctrl_c() => {}
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

async fn artifact_handler(
    State(artifact): State<Arc<PreparedResponse>>,
    request: Request<Body>,
) -> Response {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        etag = %artifact.etag(),
        "Serving artifact"
    );

    artifact.respond(ConditionalRequest::from(&request)).await
}
