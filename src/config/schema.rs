//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.
//! Every section carries defaults so a missing file or an empty file
//! yields the same configuration as running with no flags at all.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Backend and listener addresses.
    pub endpoints: HostPortContext,

    /// Request limits.
    pub limits: LimitsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Backend RPC and local HTTP addresses.
///
/// Built once at startup and shared read-only with every handler.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct HostPortContext {
    /// Backend RPC host.
    pub grpc_server_host: String,

    /// Backend RPC port.
    pub grpc_server_port: u16,

    /// Local HTTP bind host.
    pub http_server_host: String,

    /// Local HTTP bind port.
    pub http_server_port: u16,
}

impl Default for HostPortContext {
    fn default() -> Self {
        Self {
            grpc_server_host: "127.0.0.1".to_string(),
            grpc_server_port: 6570,
            http_server_host: "127.0.0.1".to_string(),
            http_server_port: 6580,
        }
    }
}

impl HostPortContext {
    /// `host:port` of the backend RPC service.
    pub fn backend_address(&self) -> String {
        join_host_port(&self.grpc_server_host, self.grpc_server_port)
    }

    /// URI used to dial the backend (plaintext HTTP/2).
    pub fn backend_uri(&self) -> String {
        format!("http://{}", self.backend_address())
    }

    /// `host:port` the HTTP listener binds to.
    pub fn listen_address(&self) -> String {
        join_host_port(&self.http_server_host, self.http_server_port)
    }
}

/// IPv6 literals get brackets so the port stays unambiguous.
fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

/// Per-request limits.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum accepted publish payload in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 4 * 1024 * 1024, // 4MB
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Backend connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Per-call RPC timeout in milliseconds. Unset means the call is bounded
    /// only by the inbound request's lifetime.
    pub rpc_ms: Option<u64>,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            rpc_ms: None,
        }
    }
}

impl TimeoutConfig {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    pub fn rpc(&self) -> Option<Duration> {
        self.rpc_ms.map(Duration::from_millis)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_historical_flags() {
        let config = GatewayConfig::default();
        assert_eq!(config.endpoints.backend_address(), "127.0.0.1:6570");
        assert_eq!(config.endpoints.listen_address(), "127.0.0.1:6580");
        assert_eq!(config.endpoints.backend_uri(), "http://127.0.0.1:6570");
        assert_eq!(config.timeouts.rpc(), None);
    }

    #[test]
    fn ipv6_hosts_are_bracketed() {
        let endpoints = HostPortContext {
            grpc_server_host: "::1".to_string(),
            http_server_host: "[::]".to_string(),
            ..HostPortContext::default()
        };
        assert_eq!(endpoints.backend_address(), "[::1]:6570");
        assert_eq!(endpoints.backend_uri(), "http://[::1]:6570");
        assert_eq!(endpoints.listen_address(), "[::]:6580");
        assert!(endpoints.listen_address().parse::<std::net::SocketAddr>().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [endpoints]
            grpc_server_port = 7000

            [timeouts]
            rpc_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.endpoints.grpc_server_port, 7000);
        assert_eq!(config.endpoints.grpc_server_host, "127.0.0.1");
        assert_eq!(config.timeouts.rpc(), Some(Duration::from_millis(250)));
        assert_eq!(config.limits, LimitsConfig::default());
    }
}
