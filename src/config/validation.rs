//! Configuration validation.
//!
//! Serde handles the syntax; this module checks values. Every problem is
//! reported, not just the first one, so a bad config file can be fixed in
//! a single pass.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyHost { field: &'static str },

    #[error("{field} must not be 0")]
    ZeroPort { field: &'static str },

    #[error("limits.max_body_bytes must be greater than 0")]
    ZeroBodyLimit,

    #[error("timeouts.connect_secs must be greater than 0")]
    ZeroConnectTimeout,

    #[error("timeouts.rpc_ms must be greater than 0 when set")]
    ZeroRpcTimeout,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    BadMetricsAddress(String),
}

/// Check a merged configuration before it is frozen.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let endpoints = &config.endpoints;

    if endpoints.grpc_server_host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost { field: "grpc_server_host" });
    }
    if endpoints.http_server_host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost { field: "http_server_host" });
    }
    if endpoints.grpc_server_port == 0 {
        errors.push(ValidationError::ZeroPort { field: "grpc_server_port" });
    }
    // Port 0 on the listener is allowed: the OS picks one.

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroConnectTimeout);
    }
    if config.timeouts.rpc_ms == Some(0) {
        errors.push(ValidationError::ZeroRpcTimeout);
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::BadMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn reports_every_problem() {
        let mut config = GatewayConfig::default();
        config.endpoints.grpc_server_host = " ".into();
        config.endpoints.grpc_server_port = 0;
        config.limits.max_body_bytes = 0;
        config.timeouts.rpc_ms = Some(0);
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nowhere".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::ZeroRpcTimeout));
        assert!(errors.contains(&ValidationError::BadMetricsAddress("nowhere".into())));
    }

    #[test]
    fn metrics_address_ignored_when_disabled() {
        let mut config = GatewayConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());
    }
}
