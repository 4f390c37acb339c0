//! Error taxonomy for the gateway.
//!
//! Per-request variants render themselves as JSON HTTP responses and never
//! escape the handler. Startup variants (`Config`, `Bind`, `Serve`,
//! `RouteRegistrationConflict`, and `BackendUnavailable` while connecting)
//! are returned to `main`, logged, and end the process.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::time::Duration;
use thiserror::Error;
use tonic::Code;

use crate::config::ConfigError;
use crate::http::response::ErrorBody;
use crate::rpc::status::http_status_for;

/// Why reading the request body failed.
#[derive(Debug, Error)]
pub enum ReadFailure {
    /// The client went away or sent fewer bytes than it announced.
    #[error("request body truncated: {0}")]
    Truncated(String),

    /// The body is larger than the configured limit.
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    /// Anything else while pulling body frames.
    #[error("request body read failed: {0}")]
    Io(String),
}

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Missing or malformed request input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No route (or no custom verb) matches the request path.
    #[error("no route for {0}")]
    RouteNotFound(String),

    /// Failure while reading the HTTP body.
    #[error(transparent)]
    RequestRead(#[from] ReadFailure),

    /// The backend connection cannot be established or is gone.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Structured error returned by the backend RPC.
    #[error("backend error ({}): {}", .0.code(), .0.message())]
    Backend(tonic::Status),

    /// The configured per-call RPC timeout elapsed.
    #[error("backend call exceeded {0:?}")]
    DeadlineExceeded(Duration),

    /// Two route registrations cannot coexist.
    #[error("route {method} {pattern} conflicts with already registered {existing}")]
    RouteRegistrationConflict {
        method: String,
        pattern: String,
        existing: String,
    },

    /// A route pattern the router cannot hold.
    #[error("invalid route pattern {pattern}: {reason}")]
    InvalidRoutePattern { pattern: String, reason: String },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    /// gRPC code that best describes this error, reported in error bodies.
    pub fn rpc_code(&self) -> Code {
        match self {
            GatewayError::BadRequest(_) => Code::InvalidArgument,
            GatewayError::RouteNotFound(_) => Code::NotFound,
            GatewayError::RequestRead(ReadFailure::Truncated(_)) => Code::InvalidArgument,
            GatewayError::RequestRead(ReadFailure::TooLarge { .. }) => Code::ResourceExhausted,
            GatewayError::RequestRead(ReadFailure::Io(_)) => Code::Internal,
            GatewayError::BackendUnavailable(_) => Code::Unavailable,
            GatewayError::Backend(status) => status.code(),
            GatewayError::DeadlineExceeded(_) => Code::DeadlineExceeded,
            _ => Code::Internal,
        }
    }

    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::RequestRead(ReadFailure::Truncated(_)) => StatusCode::BAD_REQUEST,
            GatewayError::RequestRead(ReadFailure::TooLarge { .. }) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            GatewayError::RequestRead(ReadFailure::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Backend(status) => http_status_for(status.code()),
            GatewayError::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::BadRequest(_) => "bad_request",
            GatewayError::RouteNotFound(_) => "not_found",
            GatewayError::RequestRead(_) => "request_read_error",
            GatewayError::BackendUnavailable(_) => "backend_unavailable",
            GatewayError::Backend(_) => "backend_error",
            GatewayError::DeadlineExceeded(_) => "deadline_exceeded",
            GatewayError::RouteRegistrationConflict { .. } => "route_registration_conflict",
            GatewayError::InvalidRoutePattern { .. } => "invalid_route_pattern",
            GatewayError::Config(_) => "config_error",
            GatewayError::Bind { .. } => "bind_error",
            GatewayError::Serve(_) => "serve_error",
        }
    }

    /// Message shown to the client. Backend errors pass the RPC message
    /// through unchanged.
    pub fn client_message(&self) -> String {
        match self {
            GatewayError::Backend(status) => status.message().to_string(),
            other => other.to_string(),
        }
    }
}

impl From<tonic::Status> for GatewayError {
    fn from(status: tonic::Status) -> Self {
        GatewayError::Backend(status)
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            code: self.rpc_code() as i32,
            error: self.kind(),
            message: self.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_failures_split_by_side() {
        let truncated = GatewayError::from(ReadFailure::Truncated("eof".into()));
        assert_eq!(truncated.status_code(), StatusCode::BAD_REQUEST);

        let too_large = GatewayError::from(ReadFailure::TooLarge { limit: 10 });
        assert_eq!(too_large.status_code(), StatusCode::PAYLOAD_TOO_LARGE);

        let io = GatewayError::from(ReadFailure::Io("disk on fire".into()));
        assert_eq!(io.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn backend_error_keeps_original_message() {
        let err = GatewayError::from(tonic::Status::not_found("stream orders does not exist"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.client_message(), "stream orders does not exist");
        assert_eq!(err.rpc_code(), Code::NotFound);
    }

    #[test]
    fn backend_unavailable_is_503() {
        let err = GatewayError::BackendUnavailable("connection refused".into());
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.kind(), "backend_unavailable");
    }
}
