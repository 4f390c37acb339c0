//! HTTP ingestion gateway for HStream.
//!
//! Accepts `POST /streams/{streamName}:publish` with an opaque body and
//! appends it to the named stream through one long-lived RPC connection.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod rpc;

pub use config::{GatewayConfig, HostPortContext};
pub use error::{GatewayError, GatewayResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use rpc::{HStreamClient, PublishRequest, StreamAppender};
