//! TOTP two-factor authentication management.

use serde::Serialize;

use super::domain_failure;
use crate::client::{ApiClient, Payload, NO_BODY};
use crate::error::{ClientError, DomainError};
use crate::transport::Transport;
use crate::types::{TwoFactorSetup, TwoFactorStatus};

const SETUP_PATH: &str = "/api/two-factor/setup";
const VERIFY_PATH: &str = "/api/two-factor/verify";
const DISABLE_PATH: &str = "/api/two-factor/disable";
const STATUS_PATH: &str = "/api/two-factor/status";
const REGENERATE_PATH: &str = "/api/two-factor/regenerate-backup-codes";
const EMERGENCY_REQUEST_PATH: &str = "/api/two-factor/emergency-disable-request";
const EMERGENCY_CONFIRM_PATH: &str = "/api/two-factor/emergency-disable-confirm";

#[derive(Serialize)]
struct CodeBody<'a> {
    code: &'a str,
}

#[derive(Serialize)]
struct DisableBody<'a> {
    password: &'a str,
    code: &'a str,
}

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct TokenBody<'a> {
    token: &'a str,
}

/// Two-factor calls surface the API message, or a fixed fallback.
fn failure(fallback: &'static str) -> impl Fn(ClientError) -> DomainError {
    move |err| domain_failure(err, fallback, |_| None)
}

/// Start enrolment: a fresh secret, its QR code and backup codes.
pub fn setup<T: Transport>(client: &ApiClient<T>) -> Result<TwoFactorSetup, DomainError> {
    client
        .post(SETUP_PATH, NO_BODY)
        .and_then(Payload::into_typed)
        .map_err(failure("Failed to setup two-factor authentication"))
}

/// Confirm enrolment with a code from the authenticator app.
pub fn verify<T: Transport>(client: &ApiClient<T>, code: &str) -> Result<(), DomainError> {
    client
        .post(VERIFY_PATH, Some(&CodeBody { code }))
        .map(drop)
        .map_err(failure("Invalid verification code"))
}

pub fn disable<T: Transport>(client: &ApiClient<T>, password: &str, code: &str) -> Result<(), DomainError> {
    client
        .delete(DISABLE_PATH, Some(&DisableBody { password, code }))
        .map(drop)
        .map_err(failure("Failed to disable two-factor authentication"))
}

pub fn status<T: Transport>(client: &ApiClient<T>) -> Result<TwoFactorStatus, DomainError> {
    client
        .get(STATUS_PATH)
        .map_err(failure("Failed to get two-factor status"))
}

pub fn regenerate_backup_codes<T: Transport>(client: &ApiClient<T>, code: &str) -> Result<Vec<String>, DomainError> {
    client
        .post(REGENERATE_PATH, Some(&CodeBody { code }))
        .and_then(Payload::into_typed)
        .map_err(failure("Failed to regenerate backup codes"))
}

pub fn request_emergency_disable<T: Transport>(client: &ApiClient<T>, email: &str) -> Result<(), DomainError> {
    client
        .post(EMERGENCY_REQUEST_PATH, Some(&EmailBody { email }))
        .map(drop)
        .map_err(failure("Failed to request emergency disable"))
}

pub fn confirm_emergency_disable<T: Transport>(client: &ApiClient<T>, token: &str) -> Result<(), DomainError> {
    client
        .post(EMERGENCY_CONFIRM_PATH, Some(&TokenBody { token }))
        .map(drop)
        .map_err(failure("Invalid or expired token"))
}
