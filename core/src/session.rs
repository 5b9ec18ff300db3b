//! Session teardown collaborators used when the server answers 401.
//!
//! # Design
//! The client never owns browser-like state. Hosts plug in a `SessionStore`
//! per storage scope and a `Navigator`; the 401 path removes the stored user
//! from both scopes and asks the navigator to go to the login route. Every
//! sub-step runs inside its own failure boundary: a failing store never keeps
//! the other store or the navigation from running, and no failure leaves this
//! module.
//!
//! Teardown is idempotent. Parallel 401s may each run it without harm.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{info, warn};

/// Key under which the signed-in user is persisted.
pub const USER_STORAGE_KEY: &str = "user";

/// Route the navigator is sent to after a 401.
pub const LOGIN_ROUTE: &str = "/auth/login";

/// Locations under this section never trigger a redirect.
pub const AUTH_SECTION: &str = "/auth";

/// Failure of a best-effort collaborator. Logged, never propagated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HookError(pub String);

/// A key-value storage scope (persistent or per-session).
pub trait SessionStore: Send + Sync {
    fn remove(&self, key: &str) -> Result<(), HookError>;
}

/// The host's current location and a way to move it.
pub trait Navigator: Send + Sync {
    /// Path of the current location, if it can be read.
    fn current_path(&self) -> Option<String>;

    fn assign(&self, url: &str) -> Result<(), HookError>;
}

/// The collaborators consulted on a 401.
#[derive(Clone)]
pub struct SessionHooks {
    persistent: Arc<dyn SessionStore>,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionHooks {
    pub fn new(
        persistent: Arc<dyn SessionStore>,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            persistent,
            session,
            navigator,
        }
    }

    /// Hooks that do nothing, for hosts without stored session state.
    pub fn detached() -> Self {
        Self::new(Arc::new(Detached), Arc::new(Detached), Arc::new(Detached))
    }

    /// Clear both storage scopes and, unless `skip_redirect`, navigate to the
    /// login route when the host is not already in the auth section.
    pub fn clear_and_redirect(&self, skip_redirect: bool) {
        for (scope, store) in [("persistent", &self.persistent), ("session", &self.session)] {
            if let Err(err) = store.remove(USER_STORAGE_KEY) {
                warn!(scope, error = %err, "failed to clear stored user");
            }
        }

        if skip_redirect {
            return;
        }
        if let Some(path) = self.navigator.current_path() {
            if is_auth_location(&path) {
                return;
            }
        }
        match self.navigator.assign(LOGIN_ROUTE) {
            Ok(()) => info!(route = LOGIN_ROUTE, "session expired, redirecting to login"),
            Err(err) => warn!(error = %err, "failed to redirect to login"),
        }
    }
}

impl Default for SessionHooks {
    fn default() -> Self {
        Self::detached()
    }
}

impl std::fmt::Debug for SessionHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHooks").finish_non_exhaustive()
    }
}

fn is_auth_location(path: &str) -> bool {
    match path.strip_prefix(AUTH_SECTION) {
        Some(rest) => rest.is_empty() || rest.starts_with(['/', '?', '#']),
        None => false,
    }
}

struct Detached;

impl SessionStore for Detached {
    fn remove(&self, _key: &str) -> Result<(), HookError> {
        Ok(())
    }
}

impl Navigator for Detached {
    fn current_path(&self) -> Option<String> {
        None
    }

    fn assign(&self, _url: &str) -> Result<(), HookError> {
        Ok(())
    }
}

/// In-memory storage scope.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }
}

impl SessionStore for MemoryStore {
    fn remove(&self, key: &str) -> Result<(), HookError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| HookError("storage lock poisoned".to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

/// In-memory navigator that records every assignment.
#[derive(Debug, Default)]
pub struct MemoryNavigator {
    state: Mutex<NavigatorState>,
}

#[derive(Debug, Default)]
struct NavigatorState {
    current: String,
    history: Vec<String>,
}

impl MemoryNavigator {
    pub fn at(path: &str) -> Self {
        Self {
            state: Mutex::new(NavigatorState {
                current: path.to_string(),
                history: Vec::new(),
            }),
        }
    }

    /// Move without recording an assignment, like a history push.
    pub fn push(&self, path: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.current = path.to_string();
        }
    }

    /// Every URL passed to `assign`, oldest first.
    pub fn assigned(&self) -> Vec<String> {
        self.state.lock().map(|state| state.history.clone()).unwrap_or_default()
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> Option<String> {
        self.state.lock().ok().map(|state| state.current.clone())
    }

    fn assign(&self, url: &str) -> Result<(), HookError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| HookError("navigator lock poisoned".to_string()))?;
        state.current = url.to_string();
        state.history.push(url.to_string());
        Ok(())
    }
}
