//! Domain records for the domain-mail administration API.
//!
//! # Design
//! Records are keyed by identifier (`rename_all = "PascalCase"`) and decoded
//! through `policy::from_wire`, which maps the wire's snake_case keys onto
//! them. Each field names the normalizer it needs in its serde attribute:
//! `loose_int` / `loose_bool` for scalars the service encodes inconsistently,
//! `empty_as_none` / `empty_as_default` for objects that arrive as `[]` when
//! empty, and `wire_enum!` types for snake_case tokens.
//!
//! Records also implement `Serialize`; `policy::to_wire` renders them back in
//! the canonical wire shape.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::http::Params;
use crate::scalar::{loose_bool, loose_int, Invariant};
use crate::structural::{empty_as_default, empty_as_none};
use crate::wire_enum;

wire_enum! {
    /// Sex of the mailbox owner. The service reports it as 0, 1 or 2.
    pub enum Sex [allow_integer = true] {
        Unknown,
        Male,
        Female,
    }
}

wire_enum! {
    /// Failure codes reported in the response envelope's `error` field.
    pub enum ErrorCode {
        Unknown,
        NoToken,
        NoDomain,
        NoIp,
        BadDomain,
        Prohibited,
        BadToken,
        BadLogin,
        BadPasswd,
        NoAuth,
        NotAllowed,
        Blocked,
        Occupied,
        DomainLimitReached,
        NoReply,
        AccountNotFound,
    }
}

/// Fields every response may carry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope {
    #[serde(default, deserialize_with = "loose_bool::option::deserialize")]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
}

impl Envelope {
    pub fn is_failure(&self) -> bool {
        self.success == Some(false) || self.error.is_some()
    }
}

/// Identifies a mailbox either by numeric uid or by login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailboxId {
    Uid(i64),
    Login(String),
}

impl MailboxId {
    pub(crate) fn to_params(&self) -> Params {
        match self {
            MailboxId::Uid(uid) => vec![("uid".to_string(), uid.to_invariant())],
            MailboxId::Login(login) => vec![("login".to_string(), login.clone())],
        }
    }
}

impl From<i64> for MailboxId {
    fn from(uid: i64) -> Self {
        MailboxId::Uid(uid)
    }
}

impl From<&str> for MailboxId {
    fn from(login: &str) -> Self {
        MailboxId::Login(login.to_string())
    }
}

/// Result of add and delete: which mailbox was touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MailboxRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose_int::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub uid: Option<i64>,
}

/// A mailbox as listed by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Account {
    #[serde(deserialize_with = "loose_int::deserialize")]
    pub uid: i64,
    pub login: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hintq: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose_bool::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub ready: Option<bool>,
    #[serde(deserialize_with = "loose_bool::deserialize")]
    pub enabled: bool,
    #[serde(
        default,
        deserialize_with = "loose_bool::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub maillist: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

/// One page of `email/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MailboxPage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, deserialize_with = "loose_int::deserialize")]
    pub total: i64,
    #[serde(default, deserialize_with = "loose_int::deserialize")]
    pub found: i64,
    #[serde(default, deserialize_with = "loose_int::deserialize")]
    pub page: i64,
    #[serde(default, deserialize_with = "loose_int::deserialize")]
    pub on_page: i64,
    #[serde(default, deserialize_with = "loose_int::deserialize")]
    pub pages: i64,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

/// Result of `email/edit`: the mailbox as it looks after the change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EditedMailbox {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose_int::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub uid: Option<i64>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub account: Option<Account>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Counters {
    #[serde(default, deserialize_with = "loose_int::deserialize")]
    pub unread: i64,
    #[serde(default, deserialize_with = "loose_int::deserialize")]
    pub new: i64,
}

/// Result of `email/counters`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MailboxCounters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose_int::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub uid: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub counters: Counters,
}

/// DKIM state as returned by `dkim/enable` and `dkim/disable`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DkimBase {
    #[serde(deserialize_with = "loose_bool::deserialize")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txtrecord: Option<String>,
}

/// Full DKIM state as returned by `dkim/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dkim {
    #[serde(deserialize_with = "loose_bool::deserialize")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txtrecord: Option<String>,
    #[serde(default, deserialize_with = "loose_bool::deserialize")]
    pub ns_ready: bool,
    #[serde(default, deserialize_with = "loose_bool::deserialize")]
    pub mailready: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secretkey: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DkimStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub dkim: Option<Dkim>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DkimChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub dkim: Option<DkimBase>,
}

/// Request payload for `email/edit`. Only the fields that are `Some` are
/// sent; the service leaves the others unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EditMailbox {
    #[serde(skip)]
    pub id: MailboxId,
    pub enabled: Option<bool>,
    pub password: Option<String>,
    pub iname: Option<String>,
    pub fname: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub hintq: Option<String>,
    pub hinta: Option<String>,
}

impl EditMailbox {
    pub fn new(id: impl Into<MailboxId>) -> Self {
        Self {
            id: id.into(),
            enabled: None,
            password: None,
            iname: None,
            fname: None,
            birth_date: None,
            hintq: None,
            hinta: None,
        }
    }
}
