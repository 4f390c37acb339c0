//! JSON bodies written back to clients.
//!
//! # Design Decisions
//! - Success is a fixed acknowledgement schema rather than a passthrough of
//!   the RPC response encoding
//! - Errors always carry the gRPC code, a stable kind and the message text

use serde::{Deserialize, Serialize};

use crate::rpc::proto::{AppendResponse, RecordId};

/// Body of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendAck {
    pub stream_name: String,
    pub record_ids: Vec<RecordIdBody>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordIdBody {
    pub batch_id: u64,
    pub batch_index: u32,
}

impl From<RecordId> for RecordIdBody {
    fn from(id: RecordId) -> Self {
        Self {
            batch_id: id.batch_id,
            batch_index: id.batch_index,
        }
    }
}

impl From<AppendResponse> for AppendAck {
    fn from(response: AppendResponse) -> Self {
        Self {
            stream_name: response.stream_name,
            record_ids: response.record_ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody<K = &'static str> {
    /// Numeric gRPC status code.
    pub code: i32,
    /// Machine-readable error kind.
    pub error: K,
    pub message: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthBody {
    pub status: String,
    pub backend: String,
}
