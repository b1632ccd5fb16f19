//! Stateless request builder and response parser for the domain-mail API.
//!
//! # Design
//! `PddClient` holds only its `Dispatcher` (base URL, token, domain) and
//! carries no mutable state between calls. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. The caller executes the actual HTTP
//! round-trip, keeping the core deterministic and free of I/O dependencies.
//!
//! The service answers 200 for most failures and reports them in the body,
//! so every parse first checks the response envelope and only then decodes
//! the typed record.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{ClientConfig, ConfigError};
use crate::dispatch::Dispatcher;
use crate::error::{take_adapter_error, ApiError};
use crate::http::{HttpRequest, HttpResponse, Params};
use crate::naming::to_wire_name;
use crate::policy;
use crate::scalar::{yes_no, Invariant};
use crate::types::{
    DkimChange, DkimStatus, EditMailbox, EditedMailbox, Envelope, MailboxCounters, MailboxId,
    MailboxPage, MailboxRef,
};

pub const EMAIL_ADD: &str = "email/add";
pub const EMAIL_LIST: &str = "email/list";
pub const EMAIL_EDIT: &str = "email/edit";
pub const EMAIL_DEL: &str = "email/del";
pub const EMAIL_COUNTERS: &str = "email/counters";
pub const DKIM_STATUS: &str = "dkim/status";
pub const DKIM_ENABLE: &str = "dkim/enable";
pub const DKIM_DISABLE: &str = "dkim/disable";

/// Synchronous, stateless client for one administered domain.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct PddClient {
    dispatcher: Dispatcher,
}

impl PddClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            dispatcher: Dispatcher::new(config)?,
        })
    }

    pub fn domain(&self) -> &str {
        self.dispatcher.domain()
    }

    pub fn build_add_mailbox(&self, login: &str, password: &str) -> HttpRequest {
        self.dispatcher.post(
            EMAIL_ADD,
            vec![
                ("login".to_string(), login.to_string()),
                ("password".to_string(), password.to_string()),
            ],
        )
    }

    /// `page` is 1-based; both arguments fall back to the service's defaults
    /// when `None`.
    pub fn build_list_mailboxes(&self, page: Option<u32>, on_page: Option<u32>) -> HttpRequest {
        let mut params = Params::new();
        if let Some(page) = page {
            params.push((to_wire_name("Page"), page.to_invariant()));
        }
        if let Some(on_page) = on_page {
            params.push((to_wire_name("OnPage"), on_page.to_invariant()));
        }
        self.dispatcher.get(EMAIL_LIST, params)
    }

    pub fn build_edit_mailbox(&self, edit: &EditMailbox) -> Result<HttpRequest, ApiError> {
        let mut params = edit.id.to_params();
        params.extend(
            policy::to_params(edit).map_err(|e| ApiError::SerializationError(e.to_string()))?,
        );
        Ok(self.dispatcher.post(EMAIL_EDIT, params))
    }

    pub fn build_delete_mailbox(&self, id: &MailboxId) -> HttpRequest {
        self.dispatcher.post(EMAIL_DEL, id.to_params())
    }

    pub fn build_mailbox_counters(&self, id: &MailboxId) -> HttpRequest {
        self.dispatcher.get(EMAIL_COUNTERS, id.to_params())
    }

    /// With `with_secret_key` the response also carries the private key.
    pub fn build_dkim_status(&self, with_secret_key: bool) -> HttpRequest {
        let mut params = Params::new();
        if with_secret_key {
            params.push(("secretkey".to_string(), yes_no(true).to_string()));
        }
        self.dispatcher.get(DKIM_STATUS, params)
    }

    pub fn build_dkim_enable(&self) -> HttpRequest {
        self.dispatcher.post(DKIM_ENABLE, Params::new())
    }

    pub fn build_dkim_disable(&self) -> HttpRequest {
        self.dispatcher.post(DKIM_DISABLE, Params::new())
    }

    pub fn parse_add_mailbox(&self, response: HttpResponse) -> Result<MailboxRef, ApiError> {
        parse_body(EMAIL_ADD, response)
    }

    pub fn parse_list_mailboxes(&self, response: HttpResponse) -> Result<MailboxPage, ApiError> {
        parse_body(EMAIL_LIST, response)
    }

    pub fn parse_edit_mailbox(&self, response: HttpResponse) -> Result<EditedMailbox, ApiError> {
        parse_body(EMAIL_EDIT, response)
    }

    pub fn parse_delete_mailbox(&self, response: HttpResponse) -> Result<MailboxRef, ApiError> {
        parse_body(EMAIL_DEL, response)
    }

    pub fn parse_mailbox_counters(
        &self,
        response: HttpResponse,
    ) -> Result<MailboxCounters, ApiError> {
        parse_body(EMAIL_COUNTERS, response)
    }

    pub fn parse_dkim_status(&self, response: HttpResponse) -> Result<DkimStatus, ApiError> {
        parse_body(DKIM_STATUS, response)
    }

    pub fn parse_dkim_enable(&self, response: HttpResponse) -> Result<DkimChange, ApiError> {
        parse_body(DKIM_ENABLE, response)
    }

    pub fn parse_dkim_disable(&self, response: HttpResponse) -> Result<DkimChange, ApiError> {
        parse_body(DKIM_DISABLE, response)
    }
}

/// Status check, envelope check, then typed decode through the naming policy.
fn parse_body<T: DeserializeOwned>(endpoint: &str, response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response, 200)?;

    let value: Value = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    let value = policy::to_identifier_keys(value);

    let envelope: Envelope = decode(value.clone())?;
    if envelope.is_failure() {
        let code = envelope.error.unwrap_or_else(|| "unknown".to_string());
        tracing::warn!(endpoint, code = %code, "service reported failure");
        return Err(ApiError::Remote {
            code,
            domain: envelope.domain,
        });
    }

    decode(value)
}

/// A failed normalizer is reported as `ApiError::Normalize` with its kind;
/// any other decode failure as `DeserializationError`.
fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    take_adapter_error();
    policy::from_identified(value).map_err(|e| match take_adapter_error() {
        Some(kind) => ApiError::Normalize(kind),
        None => ApiError::DeserializationError(e.to_string()),
    })
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
