//! Backend RPC connection and the append call.
//!
//! # Responsibilities
//! - Dial the backend once at startup (failure is fatal)
//! - Share one multiplexed channel with every concurrent handler
//! - Issue exactly one unary `Append` per publish, no retries
//! - Close the channel at shutdown

use bytes::Bytes;
use std::future::Future;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::transport::{Channel, Endpoint};

use crate::config::{HostPortContext, TimeoutConfig};
use crate::error::{GatewayError, GatewayResult};
use crate::rpc::proto::{
    AppendRequest, AppendResponse, HStreamRecord, HStreamRecordHeader, RecordFlag, APPEND_PATH,
};

/// One inbound publish, ready to be sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishRequest {
    pub stream_name: String,
    pub payload: Bytes,
    pub flag: RecordFlag,
    /// Optional ordering key for the record.
    pub key: Option<String>,
    /// Correlation id forwarded as `x-request-id` metadata.
    pub request_id: Option<String>,
}

impl PublishRequest {
    pub fn new(stream_name: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            stream_name: stream_name.into(),
            payload: payload.into(),
            flag: RecordFlag::Raw,
            key: None,
            request_id: None,
        }
    }

    /// Wrap the payload as a single record. The payload is not inspected.
    pub fn to_append_request(&self) -> AppendRequest {
        let header = HStreamRecordHeader {
            flag: self.flag as i32,
            key: self.key.clone().unwrap_or_default(),
            ..Default::default()
        };
        AppendRequest {
            stream_name: self.stream_name.clone(),
            records: vec![HStreamRecord {
                header: Some(header),
                payload: self.payload.clone(),
            }],
        }
    }
}

/// Anything that can append a publish request to a stream.
///
/// Implementations must tolerate arbitrarily many concurrent calls through
/// a shared reference.
pub trait StreamAppender: Send + Sync + 'static {
    fn append(
        &self,
        request: PublishRequest,
    ) -> impl Future<Output = GatewayResult<AppendResponse>> + Send;
}

/// Long-lived client for the backend RPC service.
///
/// Cloning is cheap and shares the underlying HTTP/2 connection.
#[derive(Clone)]
pub struct HStreamClient {
    channel: Channel,
    address: String,
}

impl HStreamClient {
    /// Dial the backend and wait until the connection is established.
    pub async fn connect(endpoints: &HostPortContext, timeouts: &TimeoutConfig) -> GatewayResult<Self> {
        let address = endpoints.backend_address();
        let endpoint = Endpoint::from_shared(endpoints.backend_uri())
            .map_err(|e| {
                GatewayError::BackendUnavailable(format!(
                    "invalid backend address {}: {}",
                    address,
                    describe(&e)
                ))
            })?
            .connect_timeout(timeouts.connect());

        tracing::info!(backend = %address, "Connecting to backend");

        let channel = endpoint.connect().await.map_err(|e| {
            GatewayError::BackendUnavailable(format!("{}: {}", address, describe(&e)))
        })?;

        tracing::info!(backend = %address, "Backend connection established");
        Ok(Self { channel, address })
    }

    /// `host:port` this client is connected to.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Release the connection. In-flight clones keep it alive until they finish.
    pub fn close(self) {
        tracing::info!(backend = %self.address, "Closing backend connection");
        drop(self.channel);
    }
}

impl StreamAppender for HStreamClient {
    async fn append(&self, request: PublishRequest) -> GatewayResult<AppendResponse> {
        let mut grpc = tonic::client::Grpc::new(self.channel.clone());
        grpc.ready().await.map_err(|e| {
            GatewayError::BackendUnavailable(format!("service was not ready: {}", describe(&e)))
        })?;

        let mut rpc = tonic::Request::new(request.to_append_request());
        if let Some(id) = &request.request_id {
            if let Ok(value) = id.parse::<MetadataValue<Ascii>>() {
                rpc.metadata_mut().insert("x-request-id", value);
            }
        }

        let codec: ProstCodec<AppendRequest, AppendResponse> = ProstCodec::default();
        let response = grpc
            .unary(rpc, PathAndQuery::from_static(APPEND_PATH), codec)
            .await?;
        Ok(response.into_inner())
    }
}

impl std::fmt::Debug for HStreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HStreamClient")
            .field("address", &self.address)
            .finish()
    }
}

/// Render an error with its whole source chain; tonic's transport errors
/// hide the useful part in `source()`.
fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
