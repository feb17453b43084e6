//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, timeout)
//! - Bind server to listener (plain or TLS)
//! - Drain in-flight requests on shutdown

use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::blockchain::{ChainRpc, MultisigSubmitter};
use crate::config::GatewayConfig;
use crate::http::docs;
use crate::http::handlers::{get_block_number, health, submit_transaction};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestSpan};
use crate::http::tls::load_tls_config;
use crate::lifecycle::Shutdown;

/// Grace period for in-flight requests once shutdown starts (TLS listener).
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
///
/// Everything here is built once at startup and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<dyn ChainRpc>,
    pub submitter: Arc<MultisigSubmitter>,
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    pub fn new(
        config: GatewayConfig,
        chain: Arc<dyn ChainRpc>,
        submitter: MultisigSubmitter,
    ) -> Self {
        Self {
            chain,
            submitter: Arc::new(submitter),
            config: Arc::new(config),
        }
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server around prepared state.
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(state: AppState) -> Router {
        let request_timeout = Duration::from_secs(state.config.timeouts.request_secs);
        let max_body_size = state.config.security.max_body_size;

        Router::new()
            .route("/block-number", get(get_block_number))
            .route("/submit-transaction", post(submit_transaction))
            .route("/health", get(health))
            .merge(docs::swagger_ui())
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(RequestSpan))
                    .layer(propagate_request_id_layer())
                    .layer(RequestBodyLimitLayer::new(max_body_size))
                    .layer(TimeoutLayer::new(request_timeout)),
            )
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;

        match self.config.listener.tls.clone() {
            None => {
                tracing::info!(address = %addr, "HTTP server starting");
                axum::serve(listener, self.router)
                    .with_graceful_shutdown(shutdown.wait())
                    .await?;
            }
            Some(tls) => {
                tracing::info!(address = %addr, "HTTPS server starting");
                let rustls = load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path)).await?;

                let handle = axum_server::Handle::new();
                let drain = handle.clone();
                let stop = shutdown.wait();
                tokio::spawn(async move {
                    stop.await;
                    drain.graceful_shutdown(Some(DRAIN_TIMEOUT));
                });

                axum_server::from_tcp_rustls(listener.into_std()?, rustls)
                    .handle(handle)
                    .serve(self.router.into_make_service())
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
