//! Command-line flags for the gateway binary.
//!
//! Flags only override what they name; everything else comes from the
//! config file or the schema defaults.

use clap::Parser;
use std::path::PathBuf;

use crate::config::schema::GatewayConfig;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "hstream-http-server")]
#[command(about = "HTTP/JSON gateway in front of the HStream RPC service", long_about = None)]
pub struct CliArgs {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Backend RPC host.
    #[arg(long, alias = "gRPCServerHost")]
    pub grpc_server_host: Option<String>,

    /// Backend RPC port.
    #[arg(long, alias = "gRPCServerPort")]
    pub grpc_server_port: Option<u16>,

    /// Local HTTP bind host.
    #[arg(long, alias = "httpServerHost")]
    pub http_server_host: Option<String>,

    /// Local HTTP bind port.
    #[arg(long, alias = "httpServerPort")]
    pub http_server_port: Option<u16>,

    /// Maximum publish payload size in bytes.
    #[arg(long)]
    pub max_body_bytes: Option<usize>,

    /// Per-call RPC timeout in milliseconds.
    #[arg(long)]
    pub rpc_timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Serve Prometheus metrics on this address.
    #[arg(long)]
    pub metrics_address: Option<String>,
}

impl CliArgs {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut GatewayConfig) {
        let endpoints = &mut config.endpoints;
        if let Some(host) = &self.grpc_server_host {
            endpoints.grpc_server_host = host.clone();
        }
        if let Some(port) = self.grpc_server_port {
            endpoints.grpc_server_port = port;
        }
        if let Some(host) = &self.http_server_host {
            endpoints.http_server_host = host.clone();
        }
        if let Some(port) = self.http_server_port {
            endpoints.http_server_port = port;
        }
        if let Some(limit) = self.max_body_bytes {
            config.limits.max_body_bytes = limit;
        }
        if let Some(ms) = self.rpc_timeout_ms {
            config.timeouts.rpc_ms = Some(ms);
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
        if let Some(addr) = &self.metrics_address {
            config.observability.metrics_enabled = true;
            config.observability.metrics_address = addr.clone();
        }
    }
}
