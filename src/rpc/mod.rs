//! Backend RPC subsystem.
//!
//! # Data Flow
//! ```text
//! PublishRequest (stream name, payload bytes)
//!     → client.rs (StreamAppender, one unary Append over the shared channel)
//!     → proto.rs (prost wire messages)
//!     → AppendResponse | tonic::Status
//!     → status.rs (gRPC code → HTTP status)
//! ```

pub mod client;
pub mod proto;
pub mod status;

pub use client::{HStreamClient, PublishRequest, StreamAppender};
pub use proto::{AppendResponse, RecordFlag, RecordId};
pub use status::http_status_for;
