//! Client configuration.
//!
//! Loaded from environment variables or deserialized from any serde source.
//! Only `token` and `domain` are required; the base URL defaults to the
//! service's public endpoint and is overridden in tests to point at a mock.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Public endpoint of the domain-mail administration API.
pub const DEFAULT_BASE_URL: &str = "https://pddimp.yandex.ru/api2/admin/";

pub const ENV_TOKEN: &str = "PDD_TOKEN";
pub const ENV_DOMAIN: &str = "PDD_DOMAIN";
pub const ENV_BASE_URL: &str = "PDD_BASE_URL";

/// Errors raised while loading or validating a `ClientConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base URL '{0}' must use http or https")]
    UnsupportedScheme(String),
}

/// Connection settings for one administered domain.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root; endpoint paths such as `email/add` are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Administrator token sent in the `PddToken` header.
    pub token: String,

    /// Domain every request operates on.
    pub domain: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl ClientConfig {
    pub fn new(token: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            token: token.into(),
            domain: domain.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Read `PDD_TOKEN`, `PDD_DOMAIN` and optional `PDD_BASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(ENV_TOKEN).ok_or(ConfigError::MissingVar(ENV_TOKEN))?;
        let domain = lookup(ENV_DOMAIN).ok_or(ConfigError::MissingVar(ENV_DOMAIN))?;
        let mut config = Self::new(token, domain);
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check required values and parse the base URL.
    pub fn validate(&self) -> Result<Url, ConfigError> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::Empty("token"));
        }
        if self.domain.trim().is_empty() {
            return Err(ConfigError::Empty("domain"));
        }
        let url = Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(self.base_url.clone()));
        }
        Ok(url)
    }
}

// Never print the token.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("domain", &self.domain)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn loads_required_vars_with_default_base_url() {
        let config =
            ClientConfig::from_lookup(lookup(&[(ENV_TOKEN, "t0k"), (ENV_DOMAIN, "example.com")]))
                .unwrap();
        assert_eq!(config.token, "t0k");
        assert_eq!(config.domain, "example.com");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn base_url_can_be_overridden() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_TOKEN, "t"),
            (ENV_DOMAIN, "example.com"),
            (ENV_BASE_URL, "http://127.0.0.1:8080/api2/admin"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080/api2/admin");
    }

    #[test]
    fn missing_token_is_reported() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_DOMAIN, "example.com")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ENV_TOKEN)));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = ClientConfig::new("t", "example.com").with_base_url("not a url");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        let config = ClientConfig::new("t", "example.com").with_base_url("ftp://host/");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn empty_domain_is_rejected() {
        let config = ClientConfig::new("t", " ");
        assert!(matches!(config.validate(), Err(ConfigError::Empty("domain"))));
    }

    #[test]
    fn deserializes_with_default_base_url() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"token":"t","domain":"example.com"}"#).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn debug_redacts_token() {
        let rendered = format!("{:?}", ClientConfig::new("secret-token", "example.com"));
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }
}
