//! Login, registration and the current user.
//!
//! The session itself is a cookie set by the server on login/registration;
//! the transport's cookie jar carries it, nothing here stores a token.

use serde_json::Value;
use tracing::{debug, info};

use super::{domain_failure, SERVER_MESSAGE};
use crate::client::{ApiClient, Payload, NO_BODY};
use crate::error::{AccountLockedError, ApiError, ClientError, DomainError, RateLimitError};
use crate::transport::Transport;
use crate::types::{LoginRequest, RegisterRequest, User};

pub const LOGIN_PATH: &str = "/api/users/login";
pub const REGISTER_PATH: &str = "/api/users/";
pub const LOGOUT_PATH: &str = "/api/users/logout";
pub const CURRENT_USER_PATH: &str = "/api/users/me";

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password. Please try again.";
pub const TOO_MANY_LOGIN_ATTEMPTS_MESSAGE: &str = "Too many login attempts. Please try again later.";
pub const ACCOUNT_LOCKED_MESSAGE: &str = "Your account is temporarily locked. Please try again later.";
pub const EMAIL_TAKEN_MESSAGE: &str = "This email is already registered. Please use a different email.";
const INVALID_REGISTRATION_MESSAGE: &str = "Invalid registration data. Please check your inputs.";
const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please try again.";
const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed. Please try again.";

const TOO_MANY_ATTEMPTS_CODE: &str = "too_many_attempts";
const ACCOUNT_LOCKED_CODE: &str = "account_locked";

pub fn login<T: Transport>(client: &ApiClient<T>, credentials: &LoginRequest) -> Result<(), DomainError> {
    match client.post(LOGIN_PATH, Some(credentials)) {
        Ok(_) => {
            info!(email = %credentials.email, "logged in");
            Ok(())
        }
        Err(err) => Err(domain_failure(err, LOGIN_FAILED_MESSAGE, classify_login_failure)),
    }
}

fn classify_login_failure(error: &ApiError) -> Option<DomainError> {
    match error.status {
        401 => Some(DomainError::failed(INVALID_CREDENTIALS_MESSAGE)),
        429 => Some(match error.error_code() {
            Some(TOO_MANY_ATTEMPTS_CODE) => DomainError::RateLimited(RateLimitError {
                message: TOO_MANY_LOGIN_ATTEMPTS_MESSAGE.to_string(),
                retry_after_seconds: data_field(error, "retryAfterSeconds", "retry_after_seconds")
                    .and_then(Value::as_u64)
                    .unwrap_or(0),
            }),
            _ => DomainError::failed(TOO_MANY_LOGIN_ATTEMPTS_MESSAGE),
        }),
        423 if error.error_code() == Some(ACCOUNT_LOCKED_CODE) => {
            let locked_until = data_field(error, "lockedUntil", "locked_until").and_then(Value::as_str)?;
            Some(DomainError::AccountLocked(AccountLockedError {
                message: ACCOUNT_LOCKED_MESSAGE.to_string(),
                locked_until: locked_until.to_string(),
            }))
        }
        status if status >= 500 => Some(DomainError::failed(SERVER_MESSAGE)),
        _ => None,
    }
}

/// Error bodies are camelCased already; the snake_case spelling is accepted
/// for bodies that reached us some other way.
fn data_field<'a>(error: &'a ApiError, camel: &str, snake: &str) -> Option<&'a Value> {
    let data = error.data.as_ref()?;
    data.get(camel).or_else(|| data.get(snake))
}

pub fn register<T: Transport>(client: &ApiClient<T>, credentials: &RegisterRequest) -> Result<(), DomainError> {
    client
        .post(REGISTER_PATH, Some(credentials))
        .map(drop)
        .map_err(|err| {
            domain_failure(err, REGISTRATION_FAILED_MESSAGE, |error| match error.status {
                409 => Some(DomainError::failed(EMAIL_TAKEN_MESSAGE)),
                400 if error.message.trim().is_empty() => Some(DomainError::failed(INVALID_REGISTRATION_MESSAGE)),
                status if status >= 500 => Some(DomainError::failed(SERVER_MESSAGE)),
                _ => None,
            })
        })
}

/// Ask the server to drop the session cookie. Failures are ignored so the
/// caller can always clear its own state afterwards.
pub fn logout<T: Transport>(client: &ApiClient<T>) {
    if let Err(err) = client.post(LOGOUT_PATH, NO_BODY) {
        debug!(error = %err, "logout request failed");
    }
}

/// The signed-in user. Accepts a bare user or one wrapped in `user`.
pub fn fetch_current_user<T: Transport>(client: &ApiClient<T>) -> Result<User, ClientError> {
    let value: Value = client.get(CURRENT_USER_PATH)?;
    let user = match value {
        Value::Object(mut map) if map.contains_key("user") => map.remove("user").unwrap_or(Value::Null),
        other => other,
    };
    Payload::Json(user).into_typed()
}
