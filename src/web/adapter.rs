//! Owned, framework-agnostic request representation.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use super::InboundRequest;

/// Adapter for converting framework-specific HTTP requests into the
/// [`InboundRequest`] boundary.
///
/// Header names are stored lowercased, so lookups are case-insensitive.
/// `Debug` output lists header *names* only; token values never appear.
///
/// # Examples
///
/// ```
/// use identity_gate::web::{InboundRequest, RequestAdapter};
/// use identity_gate::MANAGED_FOR;
///
/// let mut adapter = RequestAdapter::from_uri("req-12345", "/v1/user/read/42?fields=name");
/// adapter.add_header("X-Authenticated-User-Token", "token");
///
/// assert_eq!(adapter.path(), "/v1/user/read/42");
/// assert_eq!(adapter.query_string(), Some("fields=name"));
/// assert_eq!(adapter.header("x-authenticated-user-token"), Some("token"));
/// assert_eq!(adapter.annotation(MANAGED_FOR), None);
/// ```
#[derive(Clone)]
pub struct RequestAdapter {
    request_id: String,
    path: String,
    query_string: Option<String>,
    headers: HashMap<String, String>,
    body: Option<Value>,
    annotations: HashMap<String, String>,
}

impl RequestAdapter {
    /// Creates an adapter for a path with no query, headers or body.
    pub fn new(request_id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            path: path.into(),
            query_string: None,
            headers: HashMap::new(),
            body: None,
            annotations: HashMap::new(),
        }
    }

    /// Creates an adapter from a request target, splitting off the query
    /// string at the first `?`.
    pub fn from_uri(request_id: impl Into<String>, uri: &str) -> Self {
        match uri.split_once('?') {
            Some((path, query)) => {
                let mut adapter = Self::new(request_id, path);
                adapter.set_query_string(Some(query.to_string()));
                adapter
            }
            None => Self::new(request_id, uri),
        }
    }

    /// Sets the raw query string.
    pub fn set_query_string(&mut self, query: Option<String>) {
        self.query_string = query;
    }

    /// Adds a header; a later value for the same name replaces the earlier one.
    pub fn add_header(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Sets the parsed body.
    pub fn set_body(&mut self, body: Option<Value>) {
        self.body = body;
    }

    /// Builder-style variant of [`add_header`](Self::add_header).
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.add_header(name, value);
        self
    }

    /// Builder-style variant of [`set_body`](Self::set_body).
    pub fn with_body(mut self, body: Value) -> Self {
        self.set_body(Some(body));
        self
    }
}

impl InboundRequest for RequestAdapter {
    fn request_id(&self) -> &str {
        &self.request_id
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn query_string(&self) -> Option<&str> {
        self.query_string.as_deref()
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }

    fn set_annotation(&mut self, key: &str, value: Option<String>) {
        match value {
            Some(value) => {
                self.annotations.insert(key.to_string(), value);
            }
            None => {
                self.annotations.remove(key);
            }
        }
    }
}

impl fmt::Debug for RequestAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut header_names: Vec<&str> = self.headers.keys().map(String::as_str).collect();
        header_names.sort_unstable();
        f.debug_struct("RequestAdapter")
            .field("request_id", &self.request_id)
            .field("path", &self.path)
            .field("query_string", &self.query_string)
            .field("headers", &header_names)
            .field("has_body", &self.body.is_some())
            .field("annotations", &self.annotations)
            .finish()
    }
}
