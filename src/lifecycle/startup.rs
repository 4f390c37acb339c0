//! Startup orchestration.
//!
//! # Order
//! 1. Freeze configuration and log it
//! 2. Start the metrics exporter (optional)
//! 3. Connect to the backend
//! 4. Register routes
//! 5. Bind the HTTP listener
//! 6. Serve until a signal arrives, then close the backend connection
//!
//! Any failure in steps 3-5 is returned to the caller; the process is
//! expected to exit non-zero.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::{GatewayConfig, HostPortContext};
use crate::error::{GatewayError, GatewayResult};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::routing::RouteRegistrar;
use crate::rpc::HStreamClient;

/// Run the gateway until SIGINT/SIGTERM.
pub async fn run(config: GatewayConfig) -> GatewayResult<()> {
    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        trigger.trigger();
    });
    run_until(config, shutdown).await
}

/// Run the gateway until `shutdown` is triggered.
pub async fn run_until(config: GatewayConfig, shutdown: Shutdown) -> GatewayResult<()> {
    let config = Arc::new(config);
    log_configuration(&config.endpoints);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let client = HStreamClient::connect(&config.endpoints, &config.timeouts).await?;

    let server = HttpServer::new(
        Arc::clone(&config),
        Arc::new(client.clone()),
        RouteRegistrar::new(),
    )?;

    let listener = bind(&config.endpoints).await?;
    let served = server.run(listener, shutdown.subscribe()).await;

    client.close();
    served
}

/// Bind the HTTP listener.
pub async fn bind(endpoints: &HostPortContext) -> GatewayResult<TcpListener> {
    let addr = endpoints.listen_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| GatewayError::Bind { addr: addr.clone(), source })?;

    if let Ok(local) = listener.local_addr() {
        tracing::info!(address = %local, "Listening for connections");
    }
    Ok(listener)
}

fn log_configuration(endpoints: &HostPortContext) {
    tracing::info!(
        grpc_server_host = %endpoints.grpc_server_host,
        grpc_server_port = endpoints.grpc_server_port,
        http_server_host = %endpoints.http_server_host,
        http_server_port = endpoints.http_server_port,
        "Server is configured"
    );
}
