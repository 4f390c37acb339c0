//! Route registration with explicit conflict detection.
//!
//! # Responsibilities
//! - Collect (method, pattern) → handler registrations
//! - Reject registrations the router would shadow or refuse
//! - Freeze into an axum `Router`
//!
//! # Design Decisions
//! - Registration order is fixed: schema-generated routes first, hand-written
//!   routes after. A hand-written route that collides with a generated one
//!   is an error, never a silent override.
//! - Conflicts are returned as `GatewayError::RouteRegistrationConflict`
//!   and unroutable patterns as `GatewayError::InvalidRoutePattern`
//!   instead of letting the router panic.

use axum::http::Method;
use axum::routing::MethodRouter;
use axum::Router;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{GatewayError, GatewayResult};
use crate::routing::pattern::{check_pattern, shape_of};

/// Where a route came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOrigin {
    /// Derived from the service schema.
    Generated,
    /// Hand-written in this crate.
    Custom,
}

impl fmt::Display for RouteOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteOrigin::Generated => write!(f, "generated"),
            RouteOrigin::Custom => write!(f, "custom"),
        }
    }
}

/// A registered route, kept for conflict checks and startup logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub method: Method,
    pub pattern: String,
    pub origin: RouteOrigin,
    shape: String,
}

impl fmt::Display for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.method, self.pattern, self.origin)
    }
}

/// Builder for the merged routing table.
pub struct RouteRegistrar<S> {
    entries: Vec<RouteEntry>,
    handlers: BTreeMap<String, MethodRouter<S>>,
}

impl<S> RouteRegistrar<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            handlers: BTreeMap::new(),
        }
    }

    /// Add a route. `handler` must only answer `method`.
    pub fn register(
        &mut self,
        method: Method,
        pattern: &str,
        origin: RouteOrigin,
        handler: MethodRouter<S>,
    ) -> GatewayResult<()> {
        check_pattern(pattern).map_err(|reason| GatewayError::InvalidRoutePattern {
            pattern: pattern.to_string(),
            reason,
        })?;
        let shape = shape_of(pattern);

        let clash = self.entries.iter().find(|existing| {
            existing.shape == shape && (existing.pattern != pattern || existing.method == method)
        });
        if let Some(existing) = clash {
            return Err(GatewayError::RouteRegistrationConflict {
                method: method.to_string(),
                pattern: pattern.to_string(),
                existing: existing.to_string(),
            });
        }

        let entry = RouteEntry {
            method,
            pattern: pattern.to_string(),
            origin,
            shape,
        };
        tracing::debug!(route = %entry, "Route registered");
        self.entries.push(entry);

        let merged = match self.handlers.remove(pattern) {
            Some(previous) => previous.merge(handler),
            None => handler,
        };
        self.handlers.insert(pattern.to_string(), merged);
        Ok(())
    }

    /// Registered routes in registration order.
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Build the router. Every pattern was validated and checked for overlap
    /// on registration.
    pub fn into_router(self) -> Router<S> {
        self.handlers
            .into_iter()
            .fold(Router::new(), |router, (pattern, handler)| {
                router.route(&pattern, handler)
            })
    }
}

impl<S> Default for RouteRegistrar<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::{get, post};
    use tower::ServiceExt;

    async fn ok() -> &'static str {
        "ok"
    }

    #[test]
    fn same_method_same_shape_conflicts() {
        let mut registrar: RouteRegistrar<()> = RouteRegistrar::new();
        registrar
            .register(Method::POST, "/streams/{streamName}", RouteOrigin::Generated, post(ok))
            .unwrap();

        let err = registrar
            .register(Method::POST, "/streams/{target}", RouteOrigin::Custom, post(ok))
            .unwrap_err();
        match err {
            GatewayError::RouteRegistrationConflict { method, pattern, existing } => {
                assert_eq!(method, "POST");
                assert_eq!(pattern, "/streams/{target}");
                assert!(existing.contains("generated"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn different_parameter_names_conflict_across_methods() {
        let mut registrar: RouteRegistrar<()> = RouteRegistrar::new();
        registrar
            .register(Method::GET, "/streams/{name}", RouteOrigin::Generated, get(ok))
            .unwrap();
        assert!(registrar
            .register(Method::POST, "/streams/{target}", RouteOrigin::Custom, post(ok))
            .is_err());
    }

    #[test]
    fn duplicate_exact_registration_conflicts() {
        let mut registrar: RouteRegistrar<()> = RouteRegistrar::new();
        registrar
            .register(Method::GET, "/health", RouteOrigin::Custom, get(ok))
            .unwrap();
        assert!(registrar
            .register(Method::GET, "/health", RouteOrigin::Custom, get(ok))
            .is_err());
        assert_eq!(registrar.entries().len(), 1);
    }

    #[test]
    fn custom_verb_in_parameter_segment_is_rejected() {
        let mut registrar: RouteRegistrar<()> = RouteRegistrar::new();
        let err = registrar
            .register(
                Method::POST,
                "/streams/{streamName}:append",
                RouteOrigin::Generated,
                post(ok),
            )
            .unwrap_err();

        assert!(matches!(err, GatewayError::InvalidRoutePattern { .. }));
        assert_eq!(err.kind(), "invalid_route_pattern");
        assert!(registrar.entries().is_empty());
        // Nothing was kept, so building still succeeds.
        let _ = registrar.into_router();
    }

    #[tokio::test]
    async fn methods_on_one_pattern_are_merged() {
        let mut registrar: RouteRegistrar<()> = RouteRegistrar::new();
        registrar
            .register(Method::GET, "/streams/{streamName}", RouteOrigin::Generated, get(ok))
            .unwrap();
        registrar
            .register(Method::POST, "/streams/{streamName}", RouteOrigin::Custom, post(ok))
            .unwrap();

        let app = registrar.into_router();
        for method in [Method::GET, Method::POST] {
            let res = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri("/streams/x")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::OK);
        }
    }
}
