//! Password reset by emailed token.

use serde::Serialize;

use super::{domain_failure, SERVER_MESSAGE};
use crate::client::{ApiClient, Payload};
use crate::error::{ClientError, DomainError};
use crate::transport::Transport;
use crate::types::{PasswordResetResponse, PasswordResetValidateResponse};

const REQUEST_PATH: &str = "/api/password-reset/request";
const VALIDATE_PATH: &str = "/api/password-reset/validate";
const CONFIRM_PATH: &str = "/api/password-reset/confirm";

pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired reset token.";

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct TokenBody<'a> {
    token: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmBody<'a> {
    token: &'a str,
    new_password: &'a str,
}

/// Ask for a reset email. The server answers the same way whether or not
/// the address is known.
pub fn request_password_reset<T: Transport>(
    client: &ApiClient<T>,
    email: &str,
) -> Result<PasswordResetResponse, DomainError> {
    client
        .post(REQUEST_PATH, Some(&EmailBody { email }))
        .and_then(Payload::into_typed)
        .map_err(|err| {
            domain_failure(err, "Password reset request failed. Please try again.", |error| {
                match error.status {
                    429 => Some(DomainError::failed(
                        "Too many password reset attempts. Please try again later.",
                    )),
                    status if status >= 500 => Some(DomainError::failed(SERVER_MESSAGE)),
                    _ => None,
                }
            })
        })
}

pub fn validate_password_reset_token<T: Transport>(
    client: &ApiClient<T>,
    token: &str,
) -> Result<PasswordResetValidateResponse, DomainError> {
    client
        .post(VALIDATE_PATH, Some(&TokenBody { token }))
        .and_then(Payload::into_typed)
        .map_err(|err| {
            domain_failure(err, "Token validation failed. Please try again.", |error| match error.status {
                400 => Some(DomainError::failed(INVALID_TOKEN_MESSAGE)),
                status if status >= 500 => Some(DomainError::failed(SERVER_MESSAGE)),
                _ => None,
            })
        })
}

pub fn confirm_password_reset<T: Transport>(
    client: &ApiClient<T>,
    token: &str,
    new_password: &str,
) -> Result<(), DomainError> {
    client
        .post(CONFIRM_PATH, Some(&ConfirmBody { token, new_password }))
        .map(drop)
        .map_err(|err: ClientError| {
            domain_failure(err, "Password reset failed. Please try again.", |error| match error.status {
                400 if error.message.trim().is_empty() => Some(DomainError::failed(
                    "Invalid or expired reset token. Please request a new one.",
                )),
                429 => Some(DomainError::failed("Too many attempts. Please try again later.")),
                status if status >= 500 => Some(DomainError::failed(SERVER_MESSAGE)),
                _ => None,
            })
        })
}
