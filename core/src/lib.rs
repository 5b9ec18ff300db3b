//! Synchronous API client core for the budgeting service.
//!
//! # Overview
//! Every call goes through one pipeline: resolve the logical `/api/...` path
//! against the configured versioned base, serialize and snake_case the body,
//! run the request over a `Transport`, then either normalize a failure into
//! an `ApiError` or camelCase the successful body and decode it.
//!
//! # Design
//! - `ApiClient` holds only immutable configuration, the transport and the
//!   session hooks; it can be shared across threads when they are.
//! - Request building and response parsing are pure (`build_request`,
//!   `parse_response`) so the I/O boundary is the `Transport` trait alone.
//! - A 401 clears the host's stored user and sends it to the login route
//!   through `SessionHooks`, unless the failing request was the login itself.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod case;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod resolve;
pub mod session;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use case::{camel_to_snake, snake_to_camel, to_camel_case, to_snake_case};
pub use client::{ApiClient, Payload, NO_BODY};
pub use config::ApiConfig;
pub use error::{AccountLockedError, ApiError, ClientError, DomainError, RateLimitError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use resolve::resolve_api_url;
pub use session::{MemoryNavigator, MemoryStore, Navigator, SessionHooks, SessionStore};
pub use transport::{Transport, UreqTransport};
