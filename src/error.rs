//! Gateway error taxonomy.
//!
//! Every failure a proxied request can hit is one of four kinds. Each kind
//! maps to its own status code, and the client only ever sees a short
//! generic message; the detail goes to the log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// The service name could not be turned into a backend address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("no service name in proxy path")]
    MissingService,

    #[error("service '{0}' is not registered")]
    UnknownService(String),
}

/// The inbound request itself is unusable.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("request body could not be read: {0}")]
    UnreadableBody(String),

    #[error("forwarded path does not form a valid URI: {0}")]
    InvalidPath(String),
}

/// The backend could not be reached or did not answer in time.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("backend did not respond within {0:?}")]
    Timeout(std::time::Duration),

    #[error("backend response body could not be read: {0}")]
    Body(String),
}

/// The backend answered, but its response could not be relayed.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("backend declared JSON but sent an invalid body: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Errors surfaced by the proxy handlers.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Status code and client-safe message for this error.
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            GatewayError::Resolution(ResolutionError::MissingService) => {
                (StatusCode::BAD_REQUEST, "Missing service name")
            }
            GatewayError::Resolution(ResolutionError::UnknownService(_)) => {
                (StatusCode::NOT_FOUND, "Unknown service")
            }
            GatewayError::Client(_) => (StatusCode::BAD_REQUEST, "Invalid request"),
            GatewayError::Upstream(UpstreamError::Timeout(_)) => {
                (StatusCode::GATEWAY_TIMEOUT, "Upstream service timed out")
            }
            GatewayError::Upstream(_) => (StatusCode::BAD_GATEWAY, "Upstream service unavailable"),
            GatewayError::Translation(_) => (StatusCode::BAD_GATEWAY, "Invalid upstream response"),
            GatewayError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "An error occurred"),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status_and_message().0
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(GatewayError, StatusCode)> = vec![
            (ResolutionError::MissingService.into(), StatusCode::BAD_REQUEST),
            (
                ResolutionError::UnknownService("billing".into()).into(),
                StatusCode::NOT_FOUND,
            ),
            (
                ClientError::UnreadableBody("eof".into()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                UpstreamError::Unavailable("refused".into()).into(),
                StatusCode::BAD_GATEWAY,
            ),
            (
                UpstreamError::Timeout(Duration::from_secs(1)).into(),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                GatewayError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status(), expected, "{error}");
        }
    }

    #[test]
    fn test_translation_error_is_bad_gateway() {
        let parse = serde_json::from_slice::<serde_json::Value>(b"{oops").unwrap_err();
        let error: GatewayError = TranslationError::from(parse).into();
        assert_eq!(error.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_body_hides_internal_detail() {
        let error: GatewayError = UpstreamError::Unavailable("10.0.0.7:8083 refused".into()).into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({ "error": "Upstream service unavailable" }));
    }
}
