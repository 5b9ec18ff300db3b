//! Typed endpoints of the budgeting API.
//!
//! Each submodule is a set of free functions over `&ApiClient<T>`. Paths are
//! written unversioned (`/api/...`); the client's resolver adds the version.
//!
//! Most functions return `ClientError` untouched. The auth, password-reset
//! and two-factor functions instead translate failures into `DomainError`
//! with user-facing copy, because their callers show the message as is.

pub mod accounts;
pub mod auth;
pub mod budgets;
pub mod categories;
pub mod category_targets;
pub mod currency;
pub mod dashboard;
pub mod overlays;
pub mod pagination;
pub mod password_reset;
pub mod settings;
pub mod transactions;
pub mod two_factor;
pub mod vendors;

use url::form_urlencoded;

use crate::error::{ApiError, ClientError, DomainError};

pub const CONNECTION_MESSAGE: &str = "Unable to connect to the server. Please check your internet connection.";
pub const SERVER_MESSAGE: &str = "Server error. Please try again later.";

/// Append the non-empty `pairs` to `path` as a query string.
pub(crate) fn with_query(path: &str, pairs: &[(&str, Option<&str>)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (name, value) in pairs {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            serializer.append_pair(name, value);
            any = true;
        }
    }
    if any {
        format!("{path}?{}", serializer.finish())
    } else {
        path.to_string()
    }
}

/// Translate a client failure into user-facing copy.
///
/// `classify` sees API errors first; when it declines, the API message is
/// used, then `fallback`. Transport failures get the connection copy.
pub(crate) fn domain_failure<F>(error: ClientError, fallback: &str, classify: F) -> DomainError
where
    F: FnOnce(&ApiError) -> Option<DomainError>,
{
    match error {
        ClientError::Api(api) => classify(&api).unwrap_or_else(|| {
            if api.message.trim().is_empty() {
                DomainError::failed(fallback)
            } else {
                DomainError::failed(api.message)
            }
        }),
        ClientError::Transport(_) => DomainError::failed(CONNECTION_MESSAGE),
        ClientError::Serialization(_) | ClientError::Deserialization(_) => DomainError::failed(fallback),
    }
}
