//! Shared utilities for integration testing.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hstream_http_server::rpc::proto::{AppendResponse, RecordId};
use hstream_http_server::{
    GatewayConfig, GatewayResult, HttpServer, PublishRequest, Shutdown, StreamAppender,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Fake backend that records every append.
#[derive(Default)]
pub struct RecordingAppender {
    calls: Mutex<Vec<PublishRequest>>,
    completed: AtomicUsize,
    failing_streams: HashSet<String>,
    latency: Option<Duration>,
}

#[allow(dead_code)]
impl RecordingAppender {
    /// Appends to any of `streams` fail with an internal error.
    pub fn failing_on(streams: &[&str]) -> Self {
        Self {
            failing_streams: streams.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn calls(&self) -> Vec<PublishRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Appends that ran to the end instead of being dropped mid-call.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

impl StreamAppender for RecordingAppender {
    async fn append(&self, request: PublishRequest) -> GatewayResult<AppendResponse> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(request.clone());
            calls.len() as u32 - 1
        };

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);

        if self.failing_streams.contains(&request.stream_name) {
            return Err(tonic::Status::internal(format!(
                "append to {} failed",
                request.stream_name
            ))
            .into());
        }

        Ok(AppendResponse {
            stream_name: request.stream_name,
            record_ids: vec![RecordId {
                batch_id: 1,
                batch_index: index,
            }],
        })
    }
}

/// A gateway running on an ephemeral port.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<GatewayResult<()>>,
}

#[allow(dead_code)]
impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a gateway in front of `appender`.
pub async fn start_gateway(appender: Arc<RecordingAppender>, config: GatewayConfig) -> TestGateway {
    let server = HttpServer::with_default_routes(Arc::new(config), appender).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, rx).await });

    TestGateway {
        addr,
        shutdown,
        handle,
    }
}

/// Client that never goes through an environment proxy.
#[allow(dead_code)]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
