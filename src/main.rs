//! HStream HTTP server.
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │               hstream-http-server            │
//!   POST /streams/   │  ┌────────┐   ┌──────────┐   ┌────────────┐  │   gRPC Append
//!   {name}:publish ──┼─▶│ router │──▶│ publish  │──▶│ HStream    │──┼──────────────▶ HStream
//!                    │  │(merged)│   │ handler  │   │ client     │  │   (one shared  server
//!   ◀── JSON ack ────┼──│        │◀──│          │◀──│ (channel)  │◀─┼──  connection)
//!                    │  └────────┘   └──────────┘   └────────────┘  │
//!                    └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::process::ExitCode;

use hstream_http_server::config::{resolve_config, CliArgs};
use hstream_http_server::lifecycle::startup;
use hstream_http_server::observability::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging(args.log_level.as_deref().unwrap_or("info"));
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("hstream-http-server v{} starting", env!("CARGO_PKG_VERSION"));

    match startup::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, kind = e.kind(), "Fatal error");
            ExitCode::FAILURE
        }
    }
}
