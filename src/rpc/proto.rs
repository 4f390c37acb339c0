//! Wire messages for the backend `Append` call.
//!
//! Hand-maintained prost definitions for the subset of the HStream API this
//! gateway speaks. Field tags must stay in sync with the server's schema.

use prost::bytes::Bytes;
use std::collections::HashMap;

/// Fully-qualified gRPC path of the append method.
pub const APPEND_PATH: &str = "/hstream.server.HStreamApi/Append";

/// How the backend should interpret a record payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum RecordFlag {
    Json = 0,
    Raw = 1,
}

impl RecordFlag {
    /// Pick the flag from an HTTP `Content-Type`. Only JSON media types are
    /// flagged as JSON; everything else is raw bytes.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let Some(value) = content_type else {
            return RecordFlag::Raw;
        };
        let essence = value
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if essence == "application/json" || essence.ends_with("+json") {
            RecordFlag::Json
        } else {
            RecordFlag::Raw
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HStreamRecordHeader {
    #[prost(enumeration = "RecordFlag", tag = "1")]
    pub flag: i32,
    #[prost(map = "string, string", tag = "2")]
    pub attributes: HashMap<String, String>,
    #[prost(string, tag = "4")]
    pub key: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HStreamRecord {
    #[prost(message, optional, tag = "1")]
    pub header: Option<HStreamRecordHeader>,
    #[prost(bytes = "bytes", tag = "2")]
    pub payload: Bytes,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AppendRequest {
    #[prost(string, tag = "1")]
    pub stream_name: String,
    #[prost(message, repeated, tag = "2")]
    pub records: Vec<HStreamRecord>,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct RecordId {
    #[prost(uint64, tag = "1")]
    pub batch_id: u64,
    #[prost(uint32, tag = "2")]
    pub batch_index: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AppendResponse {
    #[prost(string, tag = "1")]
    pub stream_name: String,
    #[prost(message, repeated, tag = "2")]
    pub record_ids: Vec<RecordId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn flag_from_content_type() {
        assert_eq!(RecordFlag::from_content_type(None), RecordFlag::Raw);
        assert_eq!(
            RecordFlag::from_content_type(Some("application/json; charset=utf-8")),
            RecordFlag::Json
        );
        assert_eq!(
            RecordFlag::from_content_type(Some("application/cloudevents+json")),
            RecordFlag::Json
        );
        assert_eq!(
            RecordFlag::from_content_type(Some("application/octet-stream")),
            RecordFlag::Raw
        );
        assert_eq!(RecordFlag::from_content_type(Some("text/plain")), RecordFlag::Raw);
    }

    #[test]
    fn payload_bytes_survive_encoding_untouched() {
        let payload = Bytes::from_static(&[0x00, 0xff, 0x7b, 0x0a]);
        let request = AppendRequest {
            stream_name: "s".into(),
            records: vec![HStreamRecord {
                header: Some(HStreamRecordHeader {
                    flag: RecordFlag::Raw as i32,
                    ..Default::default()
                }),
                payload: payload.clone(),
            }],
        };

        let decoded = AppendRequest::decode(request.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded.records[0].payload, payload);
        assert_eq!(decoded.records[0].header.as_ref().unwrap().flag(), RecordFlag::Raw);
    }
}
