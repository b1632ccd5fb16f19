//! Error types for the domain-mail API client.
//!
//! # Design
//! `NormalizeError` is raised by the normalization layer at the point where a
//! wire token fails to convert. It is never logged or retried there; it travels
//! to the endpoint wrapper unchanged. serde's error trait only carries a
//! message, so a normalizer running inside a serde derive also parks its
//! typed error in a per-thread slot (`adapter_error`). The client takes it
//! back out (`take_adapter_error`) when the decode fails.
//!
//! `ApiError` is what `PddClient::parse_*` returns. `Remote` gets a dedicated
//! variant because the service answers HTTP 200 with `"success": "error"`
//! for most failures.

use std::cell::RefCell;

use thiserror::Error;

use crate::enums;
use crate::types::ErrorCode;

/// A wire token did not match any shape accepted by its normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// A scalar token (integer or boolean) had an unaccepted value or kind.
    #[error("format error: {0}")]
    Format(String),

    /// A token did not name any constant of the target enumeration, or a
    /// null was supplied for a required enum field.
    #[error("cannot convert {token} to enum '{type_name}'")]
    EnumDecode {
        token: String,
        type_name: &'static str,
    },

    /// The token kind cannot represent the expected shape at all.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// Errors returned by `PddClient` parse and build methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404 for the endpoint path.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-200 status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The service accepted the request but reported a failure in the
    /// response envelope.
    #[error("remote error: {code}")]
    Remote {
        code: String,
        domain: Option<String>,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request parameters could not be serialized.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// A normalizer rejected a wire token.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

impl ApiError {
    /// The remote error code decoded as a known constant, if this is a
    /// `Remote` error with a recognised code.
    pub fn remote_code(&self) -> Option<ErrorCode> {
        match self {
            ApiError::Remote { code, .. } => {
                enums::decode_enum(&serde_json::Value::String(code.clone())).ok()
            }
            _ => None,
        }
    }
}

thread_local! {
    static ADAPTER_ERROR: RefCell<Option<NormalizeError>> = const { RefCell::new(None) };
}

/// Convert a normalizer failure into a serde error, keeping the typed error
/// for `take_adapter_error`.
pub(crate) fn adapter_error<E: serde::de::Error>(err: NormalizeError) -> E {
    let serde_err = E::custom(&err);
    ADAPTER_ERROR.with(|slot| *slot.borrow_mut() = Some(err));
    serde_err
}

/// The last normalizer failure raised on this thread, if any. Clears it.
pub(crate) fn take_adapter_error() -> Option<NormalizeError> {
    ADAPTER_ERROR.with(|slot| slot.borrow_mut().take())
}

/// Describe the kind of a JSON token for error messages.
pub(crate) fn token_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
