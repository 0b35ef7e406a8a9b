//! Response handling and transformation.
//!
//! # Responsibilities
//! - Capture the backend reply (status, content-type, body)
//! - Re-encode JSON replies, relay everything else as-is
//! - Keep the backend status code in both cases
//!
//! # Design Decisions
//! - JSON is decoded then re-encoded: semantically equal, not byte-identical
//! - A JSON content-type with an undecodable body is an upstream failure
//! - Non-JSON bodies are relayed unchanged, defaulting to text/plain

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, StatusCode},
    response::Response,
};

use crate::error::TranslationError;

const APPLICATION_JSON: &str = "application/json";
const TEXT_PLAIN: &str = "text/plain";

/// A backend reply, fully buffered.
#[derive(Debug, Clone)]
pub struct ProxiedResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl ProxiedResponse {
    pub fn new(status: StatusCode, content_type: Option<HeaderValue>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    /// Whether the backend declared a JSON body.
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_ref()
            .and_then(|ct| ct.to_str().ok())
            .is_some_and(|ct| ct.contains(APPLICATION_JSON))
    }

    /// Build the client response.
    pub fn translate(self) -> Result<Response, TranslationError> {
        if self.is_json() {
            // Nothing to decode in an empty reply (e.g. 204).
            let body = if self.body.is_empty() {
                Body::empty()
            } else {
                let value: serde_json::Value = serde_json::from_slice(&self.body)?;
                Body::from(serde_json::to_vec(&value)?)
            };
            return Ok(build(self.status, HeaderValue::from_static(APPLICATION_JSON), body));
        }

        let content_type = self
            .content_type
            .unwrap_or_else(|| HeaderValue::from_static(TEXT_PLAIN));
        Ok(build(self.status, content_type, Body::from(self.body)))
    }
}

fn build(status: StatusCode, content_type: HeaderValue, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, content_type);
    response
}
