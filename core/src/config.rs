//! Process-wide API base path configuration.
//!
//! # Design
//! The base path is computed once, from `API_BASE_PATH` and/or `API_VERSION`,
//! and never recomputed. `ApiClient` holds it behind an `Arc` and hands it to
//! the URL resolver by reference, so there is no hidden global state and no
//! hot-reload.
//!
//! Resolution rules:
//! - An explicit base path (absolute URL or root-relative path) wins. It is
//!   trimmed, loses any trailing `/`, and root-relative values always start
//!   with `/`. When a version is also configured and the base path does not
//!   already end in a `/v<digits>` segment, `/v<n>` is appended.
//! - Otherwise the base path is `/api/<version>`, where the version defaults
//!   to `v1` and a bare number `2` is normalized to `v2`.

use std::env;

use tracing::debug;

use crate::resolve::{self, is_absolute_url, trailing_version_regex};

/// Environment variable carrying the API version token (`"1"`, `"v2"`, ...).
pub const API_VERSION_ENV: &str = "API_VERSION";

/// Environment variable carrying an explicit base path override.
pub const API_BASE_PATH_ENV: &str = "API_BASE_PATH";

pub const DEFAULT_API_VERSION: &str = "v1";

/// Logical prefix every typed API path starts with.
pub const API_PREFIX: &str = "/api";

/// Immutable API base path, e.g. `/api/v1` or `https://api.example.com/api/v2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_path: String,
}

impl ApiConfig {
    /// Read `API_VERSION` and `API_BASE_PATH` from the process environment.
    pub fn from_env() -> Self {
        let version = env::var(API_VERSION_ENV).ok();
        let base_path = env::var(API_BASE_PATH_ENV).ok();
        Self::from_parts(version.as_deref(), base_path.as_deref())
    }

    /// Build a config from raw, possibly absent, inputs. Empty strings count
    /// as unset.
    pub fn from_parts(version: Option<&str>, base_path: Option<&str>) -> Self {
        let version = version.and_then(normalize_version);
        let base_path = match base_path.and_then(normalize_base_path) {
            Some(base) => match version {
                Some(version) if !trailing_version_regex().is_match(&base) => format!("{base}/{version}"),
                _ => base,
            },
            None => {
                let version = version.unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
                format!("{API_PREFIX}/{version}")
            }
        };
        debug!(base_path = %base_path, "resolved API base path");
        Self { base_path }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Map a logical `/api/...` path onto this base path.
    pub fn resolve(&self, path: &str) -> String {
        resolve::resolve_api_url(self, path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_parts(None, None)
    }
}

fn normalize_version(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Some(format!("v{trimmed}"));
    }
    let digits = trimmed.strip_prefix('v').or_else(|| trimmed.strip_prefix('V'));
    match digits {
        Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
            Some(format!("v{digits}"))
        }
        _ => Some(trimmed.to_string()),
    }
}

fn normalize_base_path(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    if is_absolute_url(trimmed) || trimmed.starts_with('/') {
        Some(trimmed.to_string())
    } else {
        Some(format!("/{trimmed}"))
    }
}
