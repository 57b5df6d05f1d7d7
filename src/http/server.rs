//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all gateway handler
//! - Wire up middleware (request ID, tracing, CORS, timeout, body limit)
//! - Give body-limit and timeout rejections the same `{"error"}` shape as
//!   handler errors
//! - Serve on a listener until a shutdown signal arrives

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    middleware::map_response,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{GatewayConfig, SecretStore};
use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::http::response::ProxyResponse;
use crate::lifecycle::signals::shutdown_signal;
use crate::security::cors_layer;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
}

/// HTTP front of the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and secrets.
    pub fn new(config: GatewayConfig, secrets: SecretStore) -> Result<Self, reqwest::Error> {
        let state = AppState {
            gateway: Arc::new(Gateway::new(&config, secrets)?),
        };
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let x_request_id = axum::http::HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .route("/", any(gateway_handler))
            .route("/{*path}", any(gateway_handler))
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(map_response(json_rejections))
            .layer(cors_layer(&config.cors))
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until Ctrl+C, SIGTERM, or `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.timeouts.request_secs,
            upstream_timeout_secs = self.config.timeouts.upstream_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {}
                    _ = shutdown.recv() => tracing::info!("Shutdown triggered"),
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Catch-all handler: everything is decided by `action` or `path`.
async fn gateway_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> ProxyResponse {
    state.gateway.handle(method, headers, uri.query(), &body).await
}

/// Rewrite the plain-text `413` and empty `408` produced by the limit and
/// timeout layers into error JSON. JSON bodies, including relayed upstream
/// replies with those statuses, pass through untouched.
async fn json_rejections(response: Response) -> Response {
    let err = match response.status() {
        StatusCode::PAYLOAD_TOO_LARGE => GatewayError::PayloadTooLarge,
        StatusCode::REQUEST_TIMEOUT => GatewayError::RequestTimeout,
        _ => return response,
    };
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_json {
        return response;
    }

    tracing::warn!(kind = err.kind(), error = %err, "Request rejected by middleware");
    ProxyResponse::from_error(&err).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::config::SecretName;

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn server() -> HttpServer {
        let mut config = GatewayConfig::default();
        config.security.max_body_size = 64;
        HttpServer::new(config, SecretStore::new()).unwrap()
    }

    #[tokio::test]
    async fn every_response_gets_a_request_id() {
        let response = server()
            .router()
            .oneshot(Request::builder().uri("/?action=nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let id = response.headers()[X_REQUEST_ID].to_str().unwrap();
        assert_eq!(id.len(), 36);
    }

    #[tokio::test]
    async fn preflight_keeps_caller_request_id() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/anything")
                    .header(X_REQUEST_ID, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_success());
        assert_eq!(response.headers()[X_REQUEST_ID], "abc-123");
    }

    #[tokio::test]
    async fn oversized_body_is_413() {
        let body = format!(r#"{{"action":"createBoard","name":"{}"}}"#, "x".repeat(128));
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::CONTENT_LENGTH, body.len())
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert!(response.headers().get(X_REQUEST_ID).is_some());
        assert_eq!(body_text(response).await, r#"{"error":"Request body too large"}"#);
    }

    #[tokio::test]
    async fn oversized_body_without_length_is_413_json() {
        let body = format!(r#"{{"action":"createBoard","name":"{}"}}"#, "x".repeat(128));
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_text(response).await, r#"{"error":"Request body too large"}"#);
    }

    #[tokio::test]
    async fn slow_upstream_is_408_json() {
        // Accepts connections (via the backlog) but never answers.
        let silent = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let mut config = GatewayConfig::default();
        config.timeouts.request_secs = 1;
        config.timeouts.upstream_secs = 30;
        config.upstreams.trello_base_url = format!("http://{}", silent.local_addr().unwrap());
        let secrets = SecretStore::new()
            .with_secret(SecretName::TrelloKey, "k")
            .with_secret(SecretName::TrelloToken, "t");

        let response = HttpServer::new(config, secrets)
            .unwrap()
            .router()
            .oneshot(Request::builder().uri("/?action=getBoards").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(body_text(response).await, r#"{"error":"Request timed out"}"#);
        drop(silent);
    }

    #[tokio::test]
    async fn json_rejections_leave_other_responses_alone() {
        let relayed = ProxyResponse::json_text(
            StatusCode::REQUEST_TIMEOUT,
            r#"{"message":"upstream says slow down"}"#.to_string(),
        )
        .into_response();
        let response = json_rejections(relayed).await;
        assert_eq!(body_text(response).await, r#"{"message":"upstream says slow down"}"#);

        let ok = json_rejections((StatusCode::OK, "plain").into_response()).await;
        assert_eq!(body_text(ok).await, "plain");
    }
}
