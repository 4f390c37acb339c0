//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::cli::CliArgs;
use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file without validating it.
pub fn read_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Resolve the effective configuration: defaults, then the optional file,
/// then command-line overrides. Validation runs once on the merged result.
pub fn resolve_config(args: &CliArgs) -> Result<GatewayConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => read_config(path)?,
        None => GatewayConfig::default(),
    };
    args.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn flags_override_file() {
        let file = write_toml(
            r#"
            [endpoints]
            grpc_server_host = "10.0.0.5"
            grpc_server_port = 7000
            "#,
        );
        let args = CliArgs {
            config: Some(file.path().to_path_buf()),
            grpc_server_port: Some(7100),
            ..CliArgs::default()
        };

        let config = resolve_config(&args).unwrap();
        assert_eq!(config.endpoints.grpc_server_host, "10.0.0.5");
        assert_eq!(config.endpoints.grpc_server_port, 7100);
        assert_eq!(config.endpoints.http_server_port, 6580);
    }

    #[test]
    fn invalid_file_is_rejected() {
        let file = write_toml("[limits]\nmax_body_bytes = 0\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("max_body_bytes"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let file = write_toml("[endpoints\n");
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let args = CliArgs {
            config: Some("/definitely/not/here.toml".into()),
            ..CliArgs::default()
        };
        assert!(matches!(resolve_config(&args), Err(ConfigError::Io(_))));
    }
}
