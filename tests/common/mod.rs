//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use service_gateway::{GatewayConfig, HttpServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// What a backend saw.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub path_and_query: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub request_id: Option<String>,
    pub body: Bytes,
}

/// Requests received by a recording backend.
#[derive(Debug, Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Captured>>>);

impl Recorder {
    pub fn requests(&self) -> Vec<Captured> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    fn push(&self, captured: Captured) {
        self.0.lock().unwrap().push(captured);
    }
}

/// Serve `router` on an ephemeral local port.
pub async fn start_backend(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// A backend that records every request.
///
/// DELETE answers 204; a request with a body gets it echoed back as JSON;
/// anything else gets a small JSON description of itself.
pub async fn start_recording_backend() -> (SocketAddr, Recorder) {
    let recorder = Recorder::default();
    let router = Router::new().fallback(record).with_state(recorder.clone());
    (start_backend(router).await, recorder)
}

async fn record(State(recorder): State<Recorder>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let header_str = |name: &str| {
        parts
            .headers
            .get(name)
            .map(|v| v.to_str().unwrap().to_string())
    };

    recorder.push(Captured {
        method: parts.method.clone(),
        path_and_query: parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_default(),
        authorization: header_str("authorization"),
        content_type: header_str("content-type"),
        request_id: header_str("x-request-id"),
        body: body.clone(),
    });

    if parts.method == Method::DELETE {
        return StatusCode::NO_CONTENT.into_response();
    }
    if !body.is_empty() {
        return ([(header::CONTENT_TYPE, "application/json")], body).into_response();
    }
    Json(json!({
        "method": parts.method.as_str(),
        "path": parts.uri.path(),
    }))
    .into_response()
}

/// A backend that writes `response` verbatim on every connection.
pub async fn start_raw_backend(response: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });
    addr
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Start a gateway whose registry holds exactly `services`.
pub async fn start_gateway(
    services: &[(&str, SocketAddr)],
    tweak: impl FnOnce(&mut GatewayConfig),
) -> (SocketAddr, Shutdown) {
    let mut config = GatewayConfig::default();
    config.services = services
        .iter()
        .map(|(name, addr)| (name.to_string(), format!("http://{addr}")))
        .collect();
    tweak(&mut config);

    let server = HttpServer::new(&config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
