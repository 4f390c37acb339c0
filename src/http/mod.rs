//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, merged routes, middleware)
//!     → request.rs (request id)
//!     → publish.rs (stream name, body, one backend append)
//!         → body.rs (bounded read, client/server fault split)
//!     → response.rs (ack / error JSON)
//!     → Send to client
//! ```

pub mod body;
pub mod publish;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{AppendAck, ErrorBody, HealthBody};
pub use server::{AppState, HttpServer};
