//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the user and health handlers
//! - Wire up middleware (request ID, tracing, access log, timeout, API version)
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::handlers;
use crate::http::middleware::{access_log, api_version, ApiVersionSettings};
use crate::http::request::MakeRequestUuidV4;
use crate::lifecycle::shutdown::wait_for;
use crate::users::UserProxyService;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: UserProxyService,
    pub user_service_url: Arc<str>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server around an already-built proxy service.
    pub fn new(config: GatewayConfig, users: UserProxyService) -> Self {
        let state = AppState {
            users,
            user_service_url: Arc::from(config.user_service.base_url.as_str()),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let versioning = ApiVersionSettings::from_config(&config.api_version);

        let api = Router::new()
            .route("/api/users/{user_id}/validate", get(handlers::validate_user))
            .route("/api/users/register", post(handlers::register_user))
            .route_layer(from_fn_with_state(versioning, api_version));

        Router::new()
            .merge(api)
            .route("/health", get(handlers::health))
            .route("/ready", get(handlers::ready))
            .with_state(state)
            .layer(from_fn(access_log))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Run the server until the shutdown broadcast fires, then drain.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            user_service = %self.config.user_service.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
