//! Outbound HTTP client.
//!
//! # Responsibilities
//! - Send a proxied request to its backend
//! - Buffer the reply (bounded) into a `ProxiedResponse`
//! - Classify failures as connect/transport errors or timeouts
//!
//! # Design Decisions
//! - One pooled hyper client shared by all handlers
//! - The deadline covers the full round trip including the body
//! - No retries: a single failure is a single client-visible failure

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, Response},
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::error::UpstreamError;
use crate::http::response::ProxiedResponse;
use crate::resilience::with_deadline;

/// Pooled client for backend calls.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
    max_response_size: usize,
}

impl UpstreamClient {
    pub fn new(connect_timeout: Duration, timeout: Duration, max_response_size: usize) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            timeout,
            max_response_size,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issue the request and buffer the backend reply.
    pub async fn send(&self, outbound: Request<Body>) -> Result<ProxiedResponse, UpstreamError> {
        with_deadline(self.timeout, async {
            let response: Response<Incoming> = self.client.request(outbound).await.map_err(|e| {
                if e.is_connect() {
                    UpstreamError::Unavailable(format!("connect failed: {e}"))
                } else {
                    UpstreamError::Unavailable(e.to_string())
                }
            })?;

            let (parts, body) = response.into_parts();
            let body = axum::body::to_bytes(Body::new(body), self.max_response_size)
                .await
                .map_err(|e| UpstreamError::Body(e.to_string()))?;

            Ok(ProxiedResponse {
                status: parts.status,
                content_type: parts.headers.get(header::CONTENT_TYPE).cloned(),
                body,
            })
        })
        .await
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("timeout", &self.timeout)
            .field("max_response_size", &self.max_response_size)
            .finish()
    }
}
