//! Turns a failed `HttpResponse` into an `ApiError`.
//!
//! Body decoding never fails: an empty body yields no data, JSON is
//! camelCased, anything else is kept as the raw text. A 401 runs the session
//! teardown once per failure, except that requests to the login endpoint
//! itself never trigger the redirect.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::case::to_camel_case;
use crate::error::ApiError;
use crate::http::HttpResponse;
use crate::session::SessionHooks;

static LOGIN_ENDPOINT_REGEX: OnceLock<Regex> = OnceLock::new();

fn login_endpoint_regex() -> &'static Regex {
    LOGIN_ENDPOINT_REGEX.get_or_init(|| {
        Regex::new(r"/api(?:/v\d+)?/users/login(?:[/?#]|$)").expect("Login endpoint regex is valid")
    })
}

/// Whether `url` targets the login endpoint, versioned or not.
pub fn is_login_endpoint(url: &str) -> bool {
    login_endpoint_regex().is_match(url)
}

/// Decode an error body: empty → `None`, JSON → camelCased value, else text.
pub fn decode_error_body(body: &str) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(parsed) => Some(to_camel_case(&parsed)),
        Err(_) => Some(Value::String(body.to_string())),
    }
}

/// Pick the user-facing message for a failed request.
pub fn error_message(data: Option<&Value>, status: u16) -> String {
    match data {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        Some(Value::Object(map)) => match map.get("message") {
            Some(Value::String(message)) if !message.is_empty() => message.clone(),
            _ => fallback_message(status),
        },
        _ => fallback_message(status),
    }
}

fn fallback_message(status: u16) -> String {
    format!("Request failed: {status}")
}

/// Build the `ApiError` for a non-2xx response to `url` (the logical path the
/// caller asked for), running the 401 teardown when it applies.
pub fn normalize_failure(response: &HttpResponse, url: &str, hooks: &SessionHooks) -> ApiError {
    let data = decode_error_body(&response.body);
    let message = error_message(data.as_ref(), response.status);

    debug!(status = response.status, url, message = %message, "request failed");

    if response.status == 401 {
        warn!(url, "session rejected, clearing stored user");
        hooks.clear_and_redirect(is_login_endpoint(url));
    }

    ApiError {
        message,
        status: response.status,
        url: url.to_string(),
        data,
    }
}
