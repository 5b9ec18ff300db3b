//! Error types for the API client.
//!
//! # Design
//! Every non-2xx response becomes exactly one `ApiError` carrying the status,
//! the logical URL, a user-facing message and the best-effort decoded body.
//! The classification helpers are derived from `status` and never stored.
//!
//! `RateLimitError`, `AccountLockedError` and `DomainError` belong to domain
//! callers (login, registration, ...). The generic client never builds them.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// A failed HTTP response, normalized.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status: u16,
    pub url: String,
    pub data: Option<Value>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status: u16, url: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
            url: url.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    pub fn is_validation_error(&self) -> bool {
        self.status == 400 || self.status == 422
    }

    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }

    /// The `error` code field of an object body, if any.
    pub fn error_code(&self) -> Option<&str> {
        self.data.as_ref()?.get("error")?.as_str()
    }
}

/// The request never produced an HTTP response (DNS, refused connection, TLS).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Errors returned by `ApiClient` operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be decoded into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ClientError {
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.as_api().is_some_and(ApiError::is_not_found)
    }
}

/// Login was throttled. Built from a 429 carrying `too_many_attempts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct RateLimitError {
    pub message: String,
    pub retry_after_seconds: u64,
}

/// The account is locked. Built from a 423 carrying `account_locked`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct AccountLockedError {
    pub message: String,
    /// ISO-8601 timestamp, passed through verbatim.
    pub locked_until: String,
}

/// User-facing failure returned by the auth, password-reset and two-factor
/// functions. Serializes with a `type` discriminant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainError {
    #[error(transparent)]
    RateLimited(RateLimitError),

    #[error(transparent)]
    AccountLocked(AccountLockedError),

    #[error("{message}")]
    Failed { message: String },
}

impl DomainError {
    pub fn failed(message: impl Into<String>) -> Self {
        DomainError::Failed {
            message: message.into(),
        }
    }

    /// The serialized `type` discriminant.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::RateLimited(_) => "rate_limited",
            DomainError::AccountLocked(_) => "account_locked",
            DomainError::Failed { .. } => "failed",
        }
    }
}
