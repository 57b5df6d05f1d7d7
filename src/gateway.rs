//! Per-request pipeline.
//!
//! ```text
//! Received → Resolved → Bound → Dispatched → Translated → Sent
//!     └──────────┴─────────┴──────────┴──────────→ Failed(kind)
//! ```
//!
//! One inbound request produces at most one outbound call. Failures become
//! `{"error": ...}` bodies here; CORS headers are added by the server layer.

use std::time::{Duration, Instant};

use axum::http::{HeaderMap, Method};

use crate::config::{GatewayConfig, SecretStore, UpstreamConfig};
use crate::error::{GatewayError, GatewayResult};
use crate::http::request::{request_id, InboundRequest};
use crate::http::response::{translate, ProxyResponse};
use crate::observability::metrics;
use crate::routing::{bind, bind_passthrough, HttpMethod, ReplyKind, RouteSpec, RouteTable};
use crate::upstream::{Dispatcher, OutboundCall};

/// Metrics label for passthrough calls.
const PASSTHROUGH: &str = "passthrough";

/// Everything a request needs, read-only after construction.
#[derive(Debug)]
pub struct Gateway {
    routes: RouteTable,
    secrets: SecretStore,
    upstreams: UpstreamConfig,
    dispatcher: Dispatcher,
}

impl Gateway {
    pub fn new(config: &GatewayConfig, secrets: SecretStore) -> Result<Self, reqwest::Error> {
        Ok(Self {
            routes: RouteTable::default(),
            secrets,
            upstreams: config.upstreams.clone(),
            dispatcher: Dispatcher::new(Duration::from_secs(config.timeouts.upstream_secs))?,
        })
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn secrets(&self) -> &SecretStore {
        &self.secrets
    }

    /// Handle one inbound request end to end.
    pub async fn handle(
        &self,
        method: Method,
        headers: HeaderMap,
        query: Option<&str>,
        body: &[u8],
    ) -> ProxyResponse {
        let start = Instant::now();

        if method == Method::OPTIONS {
            return ProxyResponse::preflight();
        }

        let id = request_id(&headers).to_string();
        let (label, result) = self.process(method, headers, query, body).await;

        let response = match result {
            Ok(response) => {
                tracing::info!(
                    request_id = %id,
                    action = %label,
                    status = response.status.as_u16(),
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Request completed"
                );
                response
            }
            Err(err) => {
                let status = err.status();
                if status.is_server_error() {
                    tracing::error!(
                        request_id = %id,
                        action = %label,
                        kind = err.kind(),
                        error = %err,
                        "Request failed"
                    );
                } else {
                    tracing::warn!(
                        request_id = %id,
                        action = %label,
                        kind = err.kind(),
                        error = %err,
                        "Request rejected"
                    );
                }
                ProxyResponse::from_error(&err)
            }
        };

        metrics::record_request(&label, response.status.as_u16(), start);
        response
    }

    /// Resolve, bind, dispatch and translate. Returns the metrics label too.
    async fn process(
        &self,
        method: Method,
        headers: HeaderMap,
        query: Option<&str>,
        body: &[u8],
    ) -> (String, GatewayResult<ProxyResponse>) {
        let Some(method) = HttpMethod::from_method(&method) else {
            return ("none".to_string(), Err(GatewayError::MethodNotAllowed));
        };
        let inbound = match InboundRequest::parse(method, headers, query, body) {
            Ok(inbound) => inbound,
            Err(err) => return ("none".to_string(), Err(err)),
        };

        if let Some(action) = inbound.action() {
            let route = match self.routes.resolve(&action) {
                Ok(route) => route,
                Err(err) => return ("unknown".to_string(), Err(err)),
            };
            return (action, self.run_action(route, &inbound).await);
        }

        if let Some(path) = inbound.raw_path() {
            let result = match bind_passthrough(&path, &inbound, &self.secrets, &self.upstreams) {
                Ok(call) => self.send(&call, ReplyKind::Relay).await,
                Err(err) => Err(err),
            };
            return (PASSTHROUGH.to_string(), result);
        }

        ("none".to_string(), Err(GatewayError::UnknownAction))
    }

    async fn run_action(
        &self,
        route: &RouteSpec,
        inbound: &InboundRequest,
    ) -> GatewayResult<ProxyResponse> {
        if !route.accepts(inbound.method) {
            return Err(GatewayError::MethodNotAllowed);
        }
        let call = bind(route, inbound, &self.secrets, &self.upstreams)?;
        self.send(&call, route.reply).await
    }

    async fn send(&self, call: &OutboundCall, reply: ReplyKind) -> GatewayResult<ProxyResponse> {
        let upstream_reply = self.dispatcher.dispatch(call).await?;
        Ok(translate(upstream_reply, reply))
    }
}
