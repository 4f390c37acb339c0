//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     generated routes  ─┐
//!                        ├→ registrar.rs (conflict checks, fixed order)
//!     custom routes     ─┘        → frozen axum Router
//!
//! Per request:
//!     axum Router → handler → pattern.rs (custom verb split)
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Conflicting registrations fail startup instead of shadowing

pub mod pattern;
pub mod registrar;

pub use pattern::{parse_publish_segment, PublishTarget, PUBLISH_ROUTE};
pub use registrar::{RouteEntry, RouteOrigin, RouteRegistrar};
