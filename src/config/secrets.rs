//! Read-only secret store.
//!
//! Credentials are loaded once at startup and handed to the gateway at
//! construction. Nothing in the request path reads the environment.

use std::collections::HashMap;
use std::fmt;

/// Model used for `chat` when neither the caller nor `GEMINI_MODEL` picks one.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

const GEMINI_MODEL_VAR: &str = "GEMINI_MODEL";

/// Names of the credentials the route table can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretName {
    TrelloKey,
    TrelloToken,
    GeminiApiKey,
}

impl SecretName {
    pub const ALL: [SecretName; 3] = [
        SecretName::TrelloKey,
        SecretName::TrelloToken,
        SecretName::GeminiApiKey,
    ];

    /// Environment variable the secret is read from.
    pub fn env_var(self) -> &'static str {
        match self {
            SecretName::TrelloKey => "TRELLO_KEY",
            SecretName::TrelloToken => "TRELLO_TOKEN",
            SecretName::GeminiApiKey => "GEMINI_API_KEY",
        }
    }
}

impl fmt::Display for SecretName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_var())
    }
}

/// Process-wide credentials plus the optional model override.
#[derive(Clone, Default)]
pub struct SecretStore {
    values: HashMap<SecretName, String>,
    model_override: Option<String>,
}

impl SecretStore {
    /// Empty store; every secret is unconfigured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read all secrets from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let values = SecretName::ALL
            .iter()
            .filter_map(|name| non_empty(name.env_var()).map(|v| (*name, v)))
            .collect();

        Self {
            values,
            model_override: non_empty(GEMINI_MODEL_VAR),
        }
    }

    /// Set a secret value.
    pub fn with_secret(mut self, name: SecretName, value: impl Into<String>) -> Self {
        self.values.insert(name, value.into());
        self
    }

    /// Override the default Gemini model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_override = Some(model.into());
        self
    }

    pub fn get(&self, name: SecretName) -> Option<&str> {
        self.values.get(&name).map(String::as_str)
    }

    pub fn contains(&self, name: SecretName) -> bool {
        self.values.contains_key(&name)
    }

    /// Secrets that are not configured, in table order.
    pub fn missing(&self) -> Vec<SecretName> {
        SecretName::ALL
            .into_iter()
            .filter(|name| !self.contains(*name))
            .collect()
    }

    /// Model used when the caller does not name one.
    pub fn model(&self) -> &str {
        self.model_override.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL)
    }
}

impl fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut configured: Vec<_> = self.values.keys().map(|k| k.env_var()).collect();
        configured.sort_unstable();
        f.debug_struct("SecretStore")
            .field("configured", &configured)
            .field("model", &self.model())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn loads_present_values() {
        let store = SecretStore::from_lookup(env(&[
            ("TRELLO_KEY", "k"),
            ("TRELLO_TOKEN", "t"),
            ("GEMINI_MODEL", "gemini-pro"),
        ]));

        assert_eq!(store.get(SecretName::TrelloKey), Some("k"));
        assert_eq!(store.get(SecretName::TrelloToken), Some("t"));
        assert_eq!(store.get(SecretName::GeminiApiKey), None);
        assert_eq!(store.missing(), vec![SecretName::GeminiApiKey]);
        assert_eq!(store.model(), "gemini-pro");
    }

    #[test]
    fn blank_values_are_absent() {
        let store = SecretStore::from_lookup(env(&[("TRELLO_KEY", "  "), ("GEMINI_MODEL", "")]));
        assert!(!store.contains(SecretName::TrelloKey));
        assert_eq!(store.model(), DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn debug_never_prints_values() {
        let store = SecretStore::new()
            .with_secret(SecretName::TrelloKey, "super-secret-key")
            .with_secret(SecretName::GeminiApiKey, "AIza-secret");

        let printed = format!("{:?}", store);
        assert!(!printed.contains("super-secret-key"));
        assert!(!printed.contains("AIza-secret"));
        assert!(printed.contains("TRELLO_KEY"));
    }
}
