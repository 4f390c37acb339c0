//! `POST /streams/{streamName}:publish`.
//!
//! Turns one HTTP request into one backend `Append` call:
//! stream name from the path, raw body as the payload, backend result
//! back as JSON. Nothing is retried and nothing is deduplicated; a replayed
//! request is a second append.
//!
//! Client disconnects drop the handler future, which drops the in-flight
//! RPC and cancels it on the backend connection.

use axum::body::Body;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use std::time::Instant;

use crate::error::{GatewayError, GatewayResult};
use crate::http::body::read_body;
use crate::http::request::request_id;
use crate::http::response::AppendAck;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{parse_publish_segment, PublishTarget};
use crate::rpc::status::code_name;
use crate::rpc::{PublishRequest, RecordFlag, StreamAppender};

/// Optional query parameters of the publish route.
#[derive(Debug, Default, Deserialize)]
pub struct PublishParams {
    /// Ordering key stored in the record header.
    pub key: Option<String>,
}

pub async fn publish<A: StreamAppender>(
    State(state): State<AppState<A>>,
    target: Result<Path<String>, PathRejection>,
    params: Result<Query<PublishParams>, QueryRejection>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);

    let response = match handle(&state, target, params, &headers, body, request_id.clone()).await {
        Ok(ack) => (StatusCode::OK, Json(ack)).into_response(),
        Err(err) => {
            let status = err.status_code();
            let code = code_name(err.rpc_code());
            if status.is_server_error() {
                tracing::error!(request_id = ?request_id, status = %status, code, error = %err, "Publish failed");
            } else {
                tracing::warn!(request_id = ?request_id, status = %status, code, error = %err, "Publish rejected");
            }
            err.into_response()
        }
    };

    metrics::record_publish(response.status().as_u16(), start);
    response
}

async fn handle<A: StreamAppender>(
    state: &AppState<A>,
    target: Result<Path<String>, PathRejection>,
    params: Result<Query<PublishParams>, QueryRejection>,
    headers: &HeaderMap,
    body: Body,
    request_id: Option<String>,
) -> GatewayResult<AppendAck> {
    // 1. Stream name, before touching the body
    let Path(segment) = target.map_err(|e| GatewayError::BadRequest(e.body_text()))?;
    let stream_name = match parse_publish_segment(&segment) {
        PublishTarget::Stream(name) => name.to_string(),
        PublishTarget::MissingName => {
            return Err(GatewayError::BadRequest("missing stream name".into()))
        }
        PublishTarget::NotPublish => {
            return Err(GatewayError::RouteNotFound(format!("/streams/{segment}")))
        }
    };
    let Query(params) = params.map_err(|e| GatewayError::BadRequest(e.body_text()))?;

    // 2. Payload
    let payload = read_body(body, state.config.limits.max_body_bytes).await?;

    // 3. Append request
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let request = PublishRequest {
        stream_name,
        flag: RecordFlag::from_content_type(content_type),
        key: params.key,
        request_id,
        payload,
    };

    tracing::debug!(
        stream = %request.stream_name,
        bytes = request.payload.len(),
        flag = ?request.flag,
        "Appending to stream"
    );
    let payload_len = request.payload.len();
    let stream = request.stream_name.clone();

    // 4. One call, bounded by the request lifetime and the optional timeout
    let response = match state.config.timeouts.rpc() {
        Some(limit) => tokio::time::timeout(limit, state.appender.append(request))
            .await
            .map_err(|_| GatewayError::DeadlineExceeded(limit))??,
        None => state.appender.append(request).await?,
    };

    metrics::record_payload_bytes(payload_len);
    tracing::info!(
        stream = %stream,
        bytes = payload_len,
        records = response.record_ids.len(),
        "Appended"
    );

    Ok(AppendAck::from(response))
}
