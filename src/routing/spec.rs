//! Declarative route descriptors.
//!
//! A [`RouteSpec`] says everything the binder needs to turn an inbound
//! request into an outbound call: which upstream, which method, the path
//! template, the parameter schema and where credentials go. Specs hold names
//! of secrets, never their values.

use axum::http::Method;

use crate::config::SecretName;

/// Third-party API a route talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upstream {
    Trello,
    Gemini,
}

impl Upstream {
    pub fn name(self) -> &'static str {
        match self {
            Upstream::Trello => "trello",
            Upstream::Gemini => "gemini",
        }
    }
}

/// Methods the gateway accepts and issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 4] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
    ];

    pub fn as_method(self) -> Method {
        match self {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// `None` for anything outside GET/POST/PUT/DELETE.
    pub fn from_method(method: &Method) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_method() == *method)
    }
}

/// Where a caller-supplied parameter ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Substituted into `{name}` in the path template.
    Path,
    /// Appended as a query parameter under the given upstream name.
    Query(&'static str),
    /// Consumed by the body builder; never placed in the URL.
    Body,
}

/// How an absent parameter is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Absent or empty fails the request.
    Required,
    /// Absent becomes the empty string.
    Optional,
    /// Absent falls back to the configured Gemini model.
    ModelFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub placement: Placement,
    pub presence: Presence,
}

impl ParamSpec {
    pub const fn path(name: &'static str) -> Self {
        Self {
            name,
            placement: Placement::Path,
            presence: Presence::Required,
        }
    }

    pub const fn query(name: &'static str, upstream_name: &'static str) -> Self {
        Self {
            name,
            placement: Placement::Query(upstream_name),
            presence: Presence::Required,
        }
    }

    pub const fn body(name: &'static str) -> Self {
        Self {
            name,
            placement: Placement::Body,
            presence: Presence::Required,
        }
    }

    pub const fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self
    }

    pub const fn model_fallback(mut self) -> Self {
        self.presence = Presence::ModelFallback;
        self
    }
}

/// Where a secret is attached on the outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretPlacement {
    Query(&'static str),
    Header(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretBinding {
    pub secret: SecretName,
    pub placement: SecretPlacement,
}

/// Shape of the outbound request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    None,
    /// Gemini `generateContent` payload built from `message` and `history`.
    GeminiChat,
}

/// Shape of the relayed response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// Upstream JSON as-is, or `{"raw": text}`.
    Relay,
    /// `{"reply": text, "raw": data}` on success.
    Chat,
}

/// One supported upstream operation.
#[derive(Debug, Clone, Copy)]
pub struct RouteSpec {
    pub action: &'static str,
    pub upstream: Upstream,
    pub method: HttpMethod,
    pub path: &'static str,
    pub params: &'static [ParamSpec],
    pub secrets: &'static [SecretBinding],
    pub body: BodyKind,
    pub reply: ReplyKind,
    /// Inbound methods this action may be invoked with.
    pub accepts: &'static [HttpMethod],
}

impl RouteSpec {
    pub fn accepts(&self, method: HttpMethod) -> bool {
        self.accepts.contains(&method)
    }

    pub fn required_params(&self) -> impl Iterator<Item = &ParamSpec> {
        self.params
            .iter()
            .filter(|p| p.presence == Presence::Required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_round_trip_is_limited_to_four() {
        assert_eq!(HttpMethod::from_method(&Method::PUT), Some(HttpMethod::Put));
        assert_eq!(HttpMethod::from_method(&Method::PATCH), None);
        assert_eq!(HttpMethod::from_method(&Method::OPTIONS), None);
    }

    #[test]
    fn param_builders() {
        let p = ParamSpec::query("listId", "idList").optional();
        assert_eq!(p.placement, Placement::Query("idList"));
        assert_eq!(p.presence, Presence::Optional);
    }
}
