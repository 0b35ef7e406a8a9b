//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Extract the forwarded headers (Authorization, X-Request-ID)
//! - Decode and re-serialize JSON bodies for POST/PUT
//! - Prepare the outbound request for the backend
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A missing Authorization header is forwarded as an empty value
//! - GET and DELETE never carry a body or Content-Type

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderValue, Method, Request, Uri},
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::error::ClientError;

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a UUID v4 request id for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request id from headers, for logging.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Whether requests with this method carry a JSON body to the backend.
pub fn carries_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT
}

/// A request on its way to a backend. Built once, sent once.
#[derive(Debug)]
pub struct ProxiedRequest {
    method: Method,
    target: Uri,
    authorization: HeaderValue,
    request_id: Option<HeaderValue>,
    body: Option<Bytes>,
}

impl ProxiedRequest {
    /// Build from the inbound request and the resolved backend target.
    ///
    /// For POST and PUT the body is read (up to `max_body_size` bytes),
    /// decoded as JSON and re-serialized. Any other method drops the body.
    pub async fn from_inbound(
        target: Uri,
        request: Request<Body>,
        max_body_size: usize,
    ) -> Result<Self, ClientError> {
        let (parts, body) = request.into_parts();

        let authorization = parts
            .headers
            .get(header::AUTHORIZATION)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(""));
        let request_id = parts.headers.get(X_REQUEST_ID).cloned();

        let body = if carries_body(&parts.method) {
            let raw = axum::body::to_bytes(body, max_body_size)
                .await
                .map_err(|e| ClientError::UnreadableBody(e.to_string()))?;
            Some(reencode_json(&raw)?)
        } else {
            None
        };

        Ok(Self {
            method: parts.method,
            target,
            authorization,
            request_id,
            body,
        })
    }

    pub fn authorization(&self) -> &HeaderValue {
        &self.authorization
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Turn into the HTTP request sent to the backend.
    pub fn into_outbound(self) -> Result<Request<Body>, axum::http::Error> {
        let mut builder = Request::builder()
            .method(self.method)
            .uri(self.target)
            .header(header::AUTHORIZATION, self.authorization);

        if let Some(id) = self.request_id {
            builder = builder.header(X_REQUEST_ID, id);
        }

        match self.body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json)),
            None => builder.body(Body::empty()),
        }
    }
}

fn reencode_json(raw: &[u8]) -> Result<Bytes, ClientError> {
    let value: serde_json::Value = serde_json::from_slice(raw)?;
    Ok(Bytes::from(serde_json::to_vec(&value)?))
}
