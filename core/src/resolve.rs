//! Logical `/api/...` path to request URL mapping.
//!
//! Exactly one versioned base-path prefix is applied. Paths outside `/api`,
//! paths that already carry `/api/v<digits>`, and absolute URLs pointing
//! elsewhere pass through untouched. Absolute URLs must parse as a `Url`; the
//! version check then runs on their pathname and only the `/api` prefix is
//! swapped, so host, port, query and fragment stay byte for byte. A URL that
//! fails to parse is returned as-is.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;
use url::Url;

use crate::config::{ApiConfig, API_PREFIX};

static VERSIONED_PATH_REGEX: OnceLock<Regex> = OnceLock::new();
static TRAILING_VERSION_REGEX: OnceLock<Regex> = OnceLock::new();
static ABSOLUTE_URL_REGEX: OnceLock<Regex> = OnceLock::new();

fn versioned_path_regex() -> &'static Regex {
    VERSIONED_PATH_REGEX
        .get_or_init(|| Regex::new(r"^/api/v\d+(?:[/?#]|$)").expect("Versioned path regex is valid"))
}

pub(crate) fn trailing_version_regex() -> &'static Regex {
    TRAILING_VERSION_REGEX.get_or_init(|| Regex::new(r"/v\d+$").expect("Trailing version regex is valid"))
}

fn absolute_url_regex() -> &'static Regex {
    ABSOLUTE_URL_REGEX.get_or_init(|| {
        Regex::new(r"^(?:[A-Za-z][A-Za-z0-9+.\-]*:)?//").expect("Absolute URL regex is valid")
    })
}

/// Scheme-prefixed (`https://...`) or protocol-relative (`//host/...`).
pub fn is_absolute_url(value: &str) -> bool {
    absolute_url_regex().is_match(value)
}

/// Produce the request URL for `path` under `config`.
pub fn resolve_api_url(config: &ApiConfig, path: &str) -> String {
    if is_absolute_url(path) {
        return resolve_absolute(config, path);
    }
    let Some(rest) = strip_api_prefix(path) else {
        return path.to_string();
    };
    if versioned_path_regex().is_match(path) {
        return path.to_string();
    }
    format!("{}{rest}", config.base_path())
}

/// Returns what follows a literal `/api` prefix sitting on a path boundary.
fn strip_api_prefix(path: &str) -> Option<&str> {
    let rest = path.strip_prefix(API_PREFIX)?;
    match rest.chars().next() {
        None | Some('/' | '?' | '#') => Some(rest),
        Some(_) => None,
    }
}

fn resolve_absolute(config: &ApiConfig, raw: &str) -> String {
    let parsed = if raw.starts_with("//") {
        Url::parse(&format!("http:{raw}"))
    } else {
        Url::parse(raw)
    };
    if let Err(err) = parsed {
        debug!(url = raw, error = %err, "unparsable absolute URL left unchanged");
        return raw.to_string();
    }

    let Some(start) = path_start(raw) else {
        return raw.to_string();
    };
    let end = raw[start..]
        .find(|c: char| matches!(c, '?' | '#'))
        .map_or(raw.len(), |offset| start + offset);
    let pathname = &raw[start..end];
    if strip_api_prefix(pathname).is_none() || versioned_path_regex().is_match(pathname) {
        return raw.to_string();
    }

    format!(
        "{}{}{}",
        &raw[..start],
        base_path_component(config),
        &raw[start + API_PREFIX.len()..]
    )
}

/// Byte offset just past `scheme://authority` in `raw`.
fn path_start(raw: &str) -> Option<usize> {
    let authority = raw.find("//")? + 2;
    let len = raw[authority..]
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(raw.len() - authority);
    Some(authority + len)
}

/// The path portion of the configured base, used when the caller already
/// supplied scheme and host.
fn base_path_component(config: &ApiConfig) -> String {
    let base = config.base_path();
    if !is_absolute_url(base) {
        return base.to_string();
    }
    let candidate = if base.starts_with("//") {
        Url::parse(&format!("http:{base}"))
    } else {
        Url::parse(base)
    };
    match candidate {
        Ok(url) => url.path().trim_end_matches('/').to_string(),
        Err(_) => API_PREFIX.to_string(),
    }
}
