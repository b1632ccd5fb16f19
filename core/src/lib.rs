//! Synchronous client core for a domain-mail administration API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `PddClient` is stateless: it holds only the signed `Dispatcher`.
//! - Each remote operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - The service's wire format is loose: numbers arrive as strings or floats,
//!   booleans as `"yes"`/`"no"`/`0`/`1`, enums as snake_case tokens, and empty
//!   objects as `[]`. The normalization modules (`naming`, `scalar`, `enums`,
//!   `structural`, `policy`) map that onto fixed-shape records in `types`.
//!   They are pure functions over `serde_json::Value` and never log.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod enums;
pub mod error;
pub mod http;
pub mod naming;
pub mod policy;
pub mod scalar;
pub mod structural;
pub mod types;

pub use client::PddClient;
pub use config::{ClientConfig, ConfigError};
pub use enums::WireEnum;
pub use error::{ApiError, NormalizeError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Params};
pub use types::{
    Account, Counters, Dkim, DkimBase, DkimChange, DkimStatus, EditMailbox, EditedMailbox,
    Envelope, ErrorCode, MailboxCounters, MailboxId, MailboxPage, MailboxRef, Sex,
};
