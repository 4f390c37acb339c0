//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Merge generated routes with the hand-written ones in a fixed order
//! - Wire up middleware (request id, tracing)
//! - Serve on a bound listener until shutdown is signalled

use axum::extract::State;
use axum::http::{Method, Uri};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::http::publish::publish;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::response::HealthBody;
use crate::routing::{RouteOrigin, RouteRegistrar, PUBLISH_ROUTE};
use crate::rpc::StreamAppender;

/// Application state injected into handlers.
///
/// Both fields are read-only for the life of the process.
pub struct AppState<A> {
    pub appender: Arc<A>,
    pub config: Arc<GatewayConfig>,
}

impl<A> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            appender: Arc::clone(&self.appender),
            config: Arc::clone(&self.config),
        }
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl HttpServer {
    /// Build the server from an already populated registrar.
    ///
    /// `generated` holds the schema-derived routes; the publish and health
    /// routes are registered after them, so a collision surfaces as
    /// `RouteRegistrationConflict` on the hand-written route.
    pub fn new<A: StreamAppender>(
        config: Arc<GatewayConfig>,
        appender: Arc<A>,
        mut generated: RouteRegistrar<AppState<A>>,
    ) -> GatewayResult<Self> {
        generated.register(Method::POST, PUBLISH_ROUTE, RouteOrigin::Custom, post(publish::<A>))?;
        generated.register(Method::GET, "/health", RouteOrigin::Custom, get(health::<A>))?;

        for entry in generated.entries() {
            tracing::info!(route = %entry, "Route active");
        }

        let state = AppState {
            appender,
            config: Arc::clone(&config),
        };
        let router = Self::build_router(generated, state);
        Ok(Self { router, config })
    }

    /// Server with only the hand-written routes.
    pub fn with_default_routes<A: StreamAppender>(
        config: Arc<GatewayConfig>,
        appender: Arc<A>,
    ) -> GatewayResult<Self> {
        Self::new(config, appender, RouteRegistrar::new())
    }

    /// Build the Axum router with all middleware layers.
    fn build_router<A: StreamAppender>(
        registrar: RouteRegistrar<AppState<A>>,
        state: AppState<A>,
    ) -> Router {
        registrar
            .into_router()
            .fallback(not_found)
            .with_state(state)
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server on `listener` until `shutdown` fires, then drain
    /// in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> GatewayResult<()> {
        let addr = listener.local_addr().map_err(GatewayError::Serve)?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await
            .map_err(GatewayError::Serve)?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn into_router(self) -> Router {
        self.router
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

async fn health<A: StreamAppender>(State(state): State<AppState<A>>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok".to_string(),
        backend: state.config.endpoints.backend_address(),
    })
}

async fn not_found(uri: Uri) -> GatewayError {
    GatewayError::RouteNotFound(uri.path().to_string())
}
