//! HTTP server setup and proxy handlers.
//!
//! # Responsibilities
//! - Create Axum Router with the per-method proxy handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Resolve the service, forward the request, translate the reply
//! - Map every failure to a status code at the handler boundary

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::setup_admin_router;
use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::http::client::UpstreamClient;
use crate::http::request::{request_id, ProxiedRequest, UuidRequestId};
use crate::lifecycle::shutdown::signalled;
use crate::observability::metrics;
use crate::routing::{ProxyPath, RegistryError, ServiceRegistry, PROXY_PREFIX};

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub registry: Arc<ServiceRegistry>,
    pub client: UpstreamClient,
    pub max_body_size: usize,
}

impl AppState {
    pub fn from_config(config: &GatewayConfig) -> Result<Self, RegistryError> {
        let registry = ServiceRegistry::new(&config.services)?;
        let client = UpstreamClient::new(
            config.timeouts.connect(),
            config.timeouts.upstream(),
            config.security.max_response_size,
        );

        Ok(Self {
            registry: Arc::new(registry),
            client,
            max_body_size: config.security.max_body_size,
        })
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self, RegistryError> {
        let state = AppState::from_config(config)?;
        tracing::info!(
            services = ?state.registry.names(),
            upstream_timeout = ?state.client.timeout(),
            "Service registry loaded"
        );

        let router = Self::build_router(
            state,
            config.timeouts.request(),
            config.security.max_body_size,
        );
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(state: AppState, request_timeout: Duration, max_body_size: usize) -> Router {
        // axum falls back to the GET handler for HEAD unless HEAD has its own.
        let proxy: MethodRouter<AppState> = get(proxy_get)
            .head(reject_head)
            .post(proxy_post)
            .put(proxy_put)
            .delete(proxy_delete);

        Router::new()
            .route(&format!("{PROXY_PREFIX}/{{*path}}"), proxy.clone())
            .route(&format!("{PROXY_PREFIX}/"), proxy.clone())
            .route(PROXY_PREFIX, proxy)
            .merge(setup_admin_router())
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(RequestBodyLimitLayer::new(max_body_size))
                    .layer(TimeoutLayer::new(request_timeout)),
            )
    }

    /// The assembled router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(signalled(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

pub async fn proxy_get(State(state): State<AppState>, request: Request<Body>) -> Response {
    forward(&state, request).await
}

pub async fn proxy_post(State(state): State<AppState>, request: Request<Body>) -> Response {
    forward(&state, request).await
}

pub async fn proxy_put(State(state): State<AppState>, request: Request<Body>) -> Response {
    forward(&state, request).await
}

pub async fn proxy_delete(State(state): State<AppState>, request: Request<Body>) -> Response {
    forward(&state, request).await
}

async fn reject_head() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET,POST,PUT,DELETE")],
    )
        .into_response()
}

/// Proxy one request and turn any failure into its error response.
async fn forward(state: &AppState, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method: Method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request_id(request.headers()).to_string();

    let route = ProxyPath::from_request_path(&path);
    let service = route
        .as_ref()
        .map(|r| r.service().to_string())
        .unwrap_or_default();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        service = %service,
        path = %path,
        "Proxying request"
    );

    let result = match route {
        Ok(route) => dispatch(state, route, request).await,
        Err(e) => Err(e.into()),
    };

    let (response, metric_service) = match result {
        Ok(response) => {
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                service = %service,
                status = %response.status(),
                "Upstream responded"
            );
            (response, service.as_str())
        }
        Err(err) => {
            log_failure(&err, &request_id, &method, &service, &path);
            let label = match &err {
                GatewayError::Resolution(_) => "none",
                _ => service.as_str(),
            };
            (err.into_response(), label)
        }
    };

    metrics::record_request(
        method.as_str(),
        response.status().as_u16(),
        metric_service,
        start_time,
    );
    response
}

async fn dispatch(
    state: &AppState,
    route: ProxyPath,
    request: Request<Body>,
) -> GatewayResult<Response> {
    let endpoint = state.registry.resolve(route.service())?;
    let target = endpoint.target_uri(&route, request.uri().query())?;

    let proxied = ProxiedRequest::from_inbound(target, request, state.max_body_size).await?;
    let outbound = proxied
        .into_outbound()
        .map_err(|e| GatewayError::Internal(e.to_string()))?;
    let upstream = state.client.send(outbound).await?;

    Ok(upstream.translate()?)
}

fn log_failure(err: &GatewayError, request_id: &str, method: &Method, service: &str, path: &str) {
    match err {
        GatewayError::Resolution(_) | GatewayError::Client(_) => tracing::warn!(
            request_id = %request_id,
            method = %method,
            service = %service,
            path = %path,
            error = %err,
            "Rejected proxy request"
        ),
        _ => tracing::error!(
            request_id = %request_id,
            method = %method,
            service = %service,
            path = %path,
            error = %err,
            "Proxy request failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn router() -> Router {
        let mut config = GatewayConfig::default();
        // Nothing listens here; these tests never reach a backend.
        config.services.insert("user".into(), "http://127.0.0.1:9".into());
        HttpServer::new(&config).unwrap().router()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_service_is_not_found() {
        let response = router()
            .oneshot(Request::get("/proxy/billing/invoices").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(json_body(response).await, json!({ "error": "Unknown service" }));
    }

    #[tokio::test]
    async fn test_empty_service_is_bad_request() {
        let response = router()
            .oneshot(Request::delete("/proxy/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({ "error": "Missing service name" }));
    }

    #[tokio::test]
    async fn test_bare_prefix_is_bad_request() {
        let response = router()
            .oneshot(Request::get("/proxy").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(json_body(response).await, json!({ "error": "Missing service name" }));
    }

    #[tokio::test]
    async fn test_invalid_json_rejected_before_forwarding() {
        let response = router()
            .oneshot(
                Request::post("/proxy/user/users")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({ "error": "Invalid request" }));
    }

    #[tokio::test]
    async fn test_oversized_body_is_payload_too_large() {
        let mut config = GatewayConfig::default();
        config.security.max_body_size = 16;
        let router = HttpServer::new(&config).unwrap().router();

        let body = format!("{{\"padding\":\"{}\"}}", "x".repeat(64));
        let response = router
            .oneshot(
                Request::post("/proxy/user/users")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::CONTENT_LENGTH, body.len())
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method(Method::PATCH)
                    .uri("/proxy/user/users/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_head_is_not_proxied() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method(Method::HEAD)
                    .uri("/proxy/user/users/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET,POST,PUT,DELETE");
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let response = router()
            .oneshot(
                Request::get("/proxy/nope")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn test_admin_endpoints() {
        let response = router()
            .oneshot(Request::get("/admin/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");

        let response = router()
            .oneshot(Request::get("/admin/services").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let services = json_body(response).await;
        assert_eq!(
            services,
            json!({ "services": ["auth", "notification", "order", "payment", "product", "user"] })
        );
    }
}
