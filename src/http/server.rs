//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with lifecycle, API proxy and frontend routes
//! - Wire up middleware (request ID, tracing, timeout, host auth, locale)
//! - Serve until shutdown, then drain background tasks

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::any, Router};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::exapp::lifecycle_routes;
use crate::host::{AppCredentials, HostError, HostSdk, ModelFetcher, NextcloudClient};
use crate::http::middleware::{host_auth_middleware, locale_middleware};
use crate::http::request::MakeRequestUuidV4;
use crate::i18n::Localizer;
use crate::lifecycle::{BackgroundTasks, Shutdown};
use crate::proxy::backend::proxy_backend;
use crate::proxy::frontend::serve_frontend;
use crate::proxy::{BackendProxy, FrontendResolver};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub credentials: Arc<AppCredentials>,
    pub host: Arc<dyn HostSdk>,
    pub models: Arc<ModelFetcher>,
    pub tasks: BackgroundTasks,
    pub localizer: Arc<Localizer>,
    pub backend: BackendProxy,
    pub frontend: Arc<FrontendResolver>,
}

impl AppState {
    /// Build state from configuration with an explicit host client.
    pub fn new(config: AppConfig, host: Arc<dyn HostSdk>) -> Self {
        let localizer = Localizer::load(&config.localization, &config.app.id);
        Self {
            credentials: Arc::new(AppCredentials::from_config(&config)),
            models: Arc::new(ModelFetcher::from_config(&config)),
            tasks: BackgroundTasks::new(),
            localizer: Arc::new(localizer),
            backend: BackendProxy::new(&config),
            frontend: Arc::new(FrontendResolver::from_config(&config.frontend)),
            host,
            config: Arc::new(config),
        }
    }
}

/// HTTP server for the ExApp shim.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server that talks to the Nextcloud instance in `config`.
    pub fn new(config: AppConfig) -> Result<Self, HostError> {
        let host = Arc::new(NextcloudClient::new(&config)?);
        Ok(Self::with_host(config, host))
    }

    /// Create a server with a caller-provided host client.
    pub fn with_host(config: AppConfig, host: Arc<dyn HostSdk>) -> Self {
        let state = AppState::new(config, host);
        let router = build_router(state.clone());
        Self { router, state }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve on `listener` until `shutdown` fires, then wait (bounded) for
    /// background tasks.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = %self.state.config.backend.address,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.notified())
            .await?;

        let grace = Duration::from_secs(self.state.config.timeouts.shutdown_grace_secs);
        self.state.tasks.drain(grace).await;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.timeouts.request_secs);

    Router::new()
        .merge(lifecycle_routes())
        .route("/api/", any(proxy_backend))
        .route("/api/{*path}", any(proxy_backend))
        .route("/", any(serve_frontend))
        .route("/{*path}", any(serve_frontend))
        .layer(middleware::from_fn_with_state(state.clone(), locale_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), host_auth_middleware))
        .with_state(state)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
}
