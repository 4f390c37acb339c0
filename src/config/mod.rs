//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! schema defaults
//!     → loader.rs (optional TOML file)
//!     → cli.rs (flag overrides)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc with every handler
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults to allow running with no file
//! - Validation separates syntactic (serde) from semantic checks

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validation;

pub use cli::CliArgs;
pub use loader::{load_config, resolve_config, ConfigError};
pub use schema::{GatewayConfig, HostPortContext, LimitsConfig, ObservabilityConfig, TimeoutConfig};
pub use validation::ValidationError;
