//! Turns an endpoint name and its parameters into a signed `HttpRequest`.
//!
//! Every request carries the administrator token in the `PddToken` header and
//! the configured domain as its first parameter. GET requests put the
//! parameters in the query string; POST requests send them as a urlencoded
//! form body.

use url::form_urlencoded;

use crate::config::{ClientConfig, ConfigError};
use crate::http::{HttpMethod, HttpRequest, Params};

pub const TOKEN_HEADER: &str = "PddToken";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Clone)]
pub struct Dispatcher {
    base_url: String,
    token: String,
    domain: String,
}

impl Dispatcher {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let url = config.validate()?;
        let mut base_url = url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self {
            base_url,
            token: config.token.clone(),
            domain: config.domain.clone(),
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn get(&self, endpoint: &str, params: Params) -> HttpRequest {
        self.dispatch(HttpMethod::Get, endpoint, params)
    }

    pub fn post(&self, endpoint: &str, params: Params) -> HttpRequest {
        self.dispatch(HttpMethod::Post, endpoint, params)
    }

    fn dispatch(&self, method: HttpMethod, endpoint: &str, params: Params) -> HttpRequest {
        tracing::debug!(
            method = method.as_str(),
            endpoint,
            params = params.len(),
            "building request"
        );

        let encoded = self.encode(&params);
        let url = format!("{}{}", self.base_url, endpoint.trim_start_matches('/'));
        let mut headers = vec![(TOKEN_HEADER.to_string(), self.token.clone())];

        match method {
            HttpMethod::Get => HttpRequest {
                method,
                path: format!("{url}?{encoded}"),
                headers,
                body: None,
            },
            HttpMethod::Post => {
                headers.push(("content-type".to_string(), FORM_CONTENT_TYPE.to_string()));
                HttpRequest {
                    method,
                    path: url,
                    headers,
                    body: Some(encoded),
                }
            }
        }
    }

    fn encode(&self, params: &Params) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("domain", &self.domain)
            .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish()
    }
}

// Never print the token.
impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.base_url)
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}
