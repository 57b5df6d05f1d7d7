//! Outbound HTTP dispatch.
//!
//! # Responsibilities
//! - Issue exactly one upstream request per inbound request
//! - Enforce the server-side deadline
//! - Buffer the full upstream body
//!
//! # Design Decisions
//! - No retries and no backoff; a failure is reported once
//! - Non-2xx upstream replies are returned as data, not errors
//! - Transport errors are stripped of their URL before they travel further,
//!   since Trello URLs carry credentials in the query

use std::time::{Duration, Instant};

use axum::http::StatusCode;

use crate::error::{GatewayError, GatewayResult};
use crate::observability::metrics;
use crate::upstream::call::OutboundCall;

/// Buffered upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: String,
}

/// Shared upstream client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl Dispatcher {
    /// Create a dispatcher whose calls are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send the call and wait for the whole body.
    pub async fn dispatch(&self, call: &OutboundCall) -> GatewayResult<UpstreamReply> {
        let start = Instant::now();
        let upstream = call.upstream.name();

        let mut request = self.client.request(call.method.as_method(), &call.url);
        for (name, value) in &call.headers {
            request = request.header(*name, value);
        }
        if let Some(body) = &call.body {
            request = request.json(body);
        }

        let result = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>(UpstreamReply { status, body })
        }
        .await;

        metrics::record_upstream(upstream, start, result.is_ok());

        match result {
            Ok(reply) => {
                tracing::debug!(
                    upstream,
                    target = %call.log_target(),
                    status = reply.status.as_u16(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Upstream responded"
                );
                Ok(reply)
            }
            Err(e) => {
                let e = e.without_url();
                tracing::warn!(
                    upstream,
                    target = %call.log_target(),
                    timed_out = e.is_timeout(),
                    error = %e,
                    "Upstream unreachable"
                );
                Err(GatewayError::UpstreamUnreachable(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::spec::{HttpMethod, Upstream};

    fn call(url: String) -> OutboundCall {
        OutboundCall {
            upstream: Upstream::Trello,
            method: HttpMethod::Get,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    #[tokio::test]
    async fn connection_refused_is_unreachable() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let dispatcher = Dispatcher::new(Duration::from_secs(2)).unwrap();
        let err = dispatcher
            .dispatch(&call(format!("http://{}/1/boards?key=secret", addr)))
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::UpstreamUnreachable(_)));
        assert!(!format!("{:?}", err).contains("secret"));
    }

    #[tokio::test]
    async fn deadline_applies() {
        // Accepts but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let dispatcher = Dispatcher::new(Duration::from_millis(200)).unwrap();
        let err = dispatcher
            .dispatch(&call(format!("http://{}/slow", addr)))
            .await
            .unwrap_err();

        match err {
            GatewayError::UpstreamUnreachable(e) => assert!(e.is_timeout()),
            other => panic!("unexpected {:?}", other),
        }
    }
}
