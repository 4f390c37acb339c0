//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Connect backend → Register routes → Bind → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain requests → Close backend
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: connect, register and bind errors are fatal
//! - Listener binds last so traffic only arrives once the backend is up

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
