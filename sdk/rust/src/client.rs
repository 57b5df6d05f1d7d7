use reqwest::header::{HeaderMap, AUTHORIZATION, ORIGIN};
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One prior exchange in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String, // "user" or "assistant"
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: "assistant".into(),
            text: text.into(),
        }
    }
}

/// A buffered gateway response. Non-2xx statuses are data, not errors.
#[derive(Debug)]
pub struct GatewayReply {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl GatewayReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    async fn read(resp: reqwest::Response) -> Result<Self, reqwest::Error> {
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp.text().await?;
        Ok(Self { status, headers, body })
    }
}

pub struct GatewayClient {
    client: Client,
    gateway_url: String,
    origin: Option<String>,
}

impl GatewayClient {
    pub fn new(gateway_url: &str) -> Self {
        Self {
            client: Client::new(),
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
            origin: None,
        }
    }

    /// Send `Origin` on every request, as a browser would.
    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = Some(origin.to_string());
        self
    }

    fn request(&self, method: Method) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, format!("{}/", self.gateway_url));
        match &self.origin {
            Some(origin) => builder.header(ORIGIN, origin),
            None => builder,
        }
    }

    /// Invoke a named action.
    ///
    /// `GET` and `DELETE` carry the parameters in the query string; `POST`
    /// and `PUT` send them as a JSON object.
    pub async fn call_action(
        &self,
        method: Method,
        action: &str,
        params: &[(&str, &str)],
    ) -> Result<GatewayReply, reqwest::Error> {
        let builder = if method == Method::GET || method == Method::DELETE {
            let mut query = vec![("action", action)];
            query.extend_from_slice(params);
            self.request(method).query(&query)
        } else {
            let mut body = Map::new();
            body.insert("action".into(), Value::from(action));
            for (k, v) in params {
                body.insert((*k).into(), Value::from(*v));
            }
            self.request(method).json(&Value::Object(body))
        };
        GatewayReply::read(builder.send().await?).await
    }

    /// Ask the assistant. The reply text is under `"reply"` on success.
    pub async fn chat(
        &self,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<GatewayReply, reqwest::Error> {
        let body = serde_json::json!({
            "action": "chat",
            "message": message,
            "history": history,
        });
        let resp = self.request(Method::POST).json(&body).send().await?;
        GatewayReply::read(resp).await
    }

    /// Forward `method` to an arbitrary upstream path.
    pub async fn passthrough(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<GatewayReply, reqwest::Error> {
        let mut builder = self.request(method).query(&[("path", path)]);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        GatewayReply::read(builder.send().await?).await
    }

    /// CORS preflight for the gateway root.
    pub async fn preflight(&self) -> Result<GatewayReply, reqwest::Error> {
        let resp = self.request(Method::OPTIONS).send().await?;
        GatewayReply::read(resp).await
    }
}
