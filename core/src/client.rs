//! Request executor for the budgeting API.
//!
//! # Design
//! `ApiClient` splits every call into a pure `build_request` step that
//! produces an `HttpRequest`, a `Transport` round-trip, and a pure
//! `parse_response` step that consumes the `HttpResponse`. Only the middle
//! step touches the network.
//!
//! Request bodies are serialized with serde, rewritten to snake_case and sent
//! as JSON. Response bodies are rewritten to camelCase before any typed
//! decoding. A non-2xx status always takes the failure path in
//! `normalize` before a success body is looked at.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::case::{to_camel_case, to_snake_case};
use crate::config::ApiConfig;
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, APPLICATION_JSON, CONTENT_TYPE};
use crate::normalize::normalize_failure;
use crate::session::SessionHooks;
use crate::transport::Transport;

/// Pass as the body argument when a request has none.
pub const NO_BODY: Option<&'static Value> = None;

/// A successful response body after case conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// `application/json` body, camelCased.
    Json(Value),
    /// Raw text from a POST that did not answer with JSON.
    Text(String),
    /// Nothing usable, e.g. a PUT answered with 204.
    Empty,
}

impl Payload {
    /// Decode into `R`. Text decodes as a JSON string, `Empty` as `null`.
    pub fn into_typed<R: DeserializeOwned>(self) -> Result<R, ClientError> {
        let value = match self {
            Payload::Json(value) => value,
            Payload::Text(text) => Value::String(text),
            Payload::Empty => Value::Null,
        };
        decode(value)
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Client for the budgeting REST API.
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    config: Arc<ApiConfig>,
    transport: T,
    session: SessionHooks,
}

impl<T> ApiClient<T> {
    pub fn new(config: ApiConfig, transport: T) -> Self {
        Self::with_shared_config(Arc::new(config), transport)
    }

    pub fn with_shared_config(config: Arc<ApiConfig>, transport: T) -> Self {
        Self {
            config,
            transport,
            session: SessionHooks::detached(),
        }
    }

    /// Install the collaborators cleared on a 401.
    pub fn with_session(mut self, session: SessionHooks) -> Self {
        self.session = session;
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Describe a request to the logical `path` as plain data.
    ///
    /// POST and PUT always declare a JSON content type; PATCH and DELETE only
    /// when they carry a body.
    pub fn build_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> Result<HttpRequest, ClientError> {
        let body = match (method, body) {
            (HttpMethod::Get, _) | (_, None) => None,
            (_, Some(body)) => Some(encode_body(body)?),
        };
        let declares_json = match method {
            HttpMethod::Get => false,
            HttpMethod::Post | HttpMethod::Put => true,
            HttpMethod::Patch | HttpMethod::Delete => body.is_some(),
        };
        let headers = if declares_json {
            vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())]
        } else {
            Vec::new()
        };

        Ok(HttpRequest {
            method,
            url: self.config.resolve(path),
            headers,
            body,
        })
    }

    /// Interpret `response` to a `method` request for the logical `path`.
    ///
    /// GET bodies always come back as `Payload::Json` (unparsable text as a
    /// JSON string, empty as `null`); envelope unwrapping is left to `get`.
    pub fn parse_response(
        &self,
        method: HttpMethod,
        path: &str,
        response: HttpResponse,
    ) -> Result<Payload, ClientError> {
        if !response.is_success() {
            return Err(normalize_failure(&response, path, &self.session).into());
        }

        if method == HttpMethod::Get {
            return Ok(Payload::Json(to_camel_case(&parse_lenient(response.body))));
        }

        if response.is_json() {
            if response.body.is_empty() {
                return Ok(Payload::Empty);
            }
            return Ok(match serde_json::from_str::<Value>(&response.body) {
                Ok(value) => Payload::Json(to_camel_case(&value)),
                Err(_) => Payload::Text(response.body),
            });
        }

        match method {
            HttpMethod::Post => Ok(Payload::Text(response.body)),
            _ => Ok(Payload::Empty),
        }
    }
}

impl<T: Transport> ApiClient<T> {
    /// GET `path`, unwrapping a top-level `data` envelope, and decode.
    pub fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ClientError> {
        let value = self.get_value(path)?;
        decode(unwrap_data(value))
    }

    /// GET `path` keeping any envelope (pagination metadata), and decode.
    pub fn get_raw<R: DeserializeOwned>(&self, path: &str) -> Result<R, ClientError> {
        decode(self.get_value(path)?)
    }

    pub fn post<B: Serialize + ?Sized>(&self, path: &str, body: Option<&B>) -> Result<Payload, ClientError> {
        self.send(HttpMethod::Post, path, body)
    }

    pub fn put<B: Serialize + ?Sized>(&self, path: &str, body: Option<&B>) -> Result<Payload, ClientError> {
        self.send(HttpMethod::Put, path, body)
    }

    pub fn patch<B: Serialize + ?Sized>(&self, path: &str, body: Option<&B>) -> Result<Payload, ClientError> {
        self.send(HttpMethod::Patch, path, body)
    }

    pub fn delete<B: Serialize + ?Sized>(&self, path: &str, body: Option<&B>) -> Result<Payload, ClientError> {
        self.send(HttpMethod::Delete, path, body)
    }

    fn get_value(&self, path: &str) -> Result<Value, ClientError> {
        match self.send(HttpMethod::Get, path, NO_BODY)? {
            Payload::Json(value) => Ok(value),
            Payload::Text(text) => Ok(Value::String(text)),
            Payload::Empty => Ok(Value::Null),
        }
    }

    fn send<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> Result<Payload, ClientError> {
        let request = self.build_request(method, path, body)?;
        debug!(method = %method, path, url = %request.url, "dispatching API request");
        let response = self.transport.execute(&request)?;
        self.parse_response(method, path, response)
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<String, ClientError> {
    let value = serde_json::to_value(body).map_err(|e| ClientError::Serialization(e.to_string()))?;
    serde_json::to_string(&to_snake_case(&value)).map_err(|e| ClientError::Serialization(e.to_string()))
}

fn parse_lenient(body: String) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&body).unwrap_or(Value::String(body))
}

fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or(Value::Null),
        other => other,
    }
}

fn decode<R: DeserializeOwned>(value: Value) -> Result<R, ClientError> {
    serde_json::from_value(value).map_err(|e| ClientError::Deserialization(e.to_string()))
}
