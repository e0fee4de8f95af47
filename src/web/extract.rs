//! The request boundary consumed by the authentication engine.
//!
//! Framework integrations implement [`InboundRequest`] for their request type
//! (or convert into [`RequestAdapter`](super::RequestAdapter)). The engine
//! needs nothing beyond these accessors.

use serde_json::Value;

/// Primary access token.
pub const USER_TOKEN_HEADER: &str = "x-authenticated-user-token";

/// Alternate client identity. Read but not consumed by the decision.
pub const CLIENT_ID_HEADER: &str = "x-authenticated-client-id";

/// Delegation token proving the caller may act for another user.
pub const FOR_TOKEN_HEADER: &str = "x-authenticated-for";

/// Read access to an inbound request plus its annotation slot.
///
/// # Design Notes
///
/// Header lookup must be case-insensitive. The annotation slot is per-request
/// state: the engine clears it at the start of every decision and only fills
/// [`MANAGED_FOR`](crate::MANAGED_FOR) after an approved delegation.
///
/// # Examples
///
/// ```
/// use identity_gate::web::InboundRequest;
/// use serde_json::Value;
/// use std::collections::HashMap;
///
/// struct MyFrameworkRequest {
///     path: String,
///     headers: HashMap<String, String>,
///     flash: HashMap<String, String>,
/// }
///
/// impl InboundRequest for MyFrameworkRequest {
///     fn request_id(&self) -> &str { "req-1" }
///     fn path(&self) -> &str { &self.path }
///     fn query_string(&self) -> Option<&str> { None }
///     fn header(&self, name: &str) -> Option<&str> {
///         self.headers
///             .iter()
///             .find(|(k, _)| k.eq_ignore_ascii_case(name))
///             .map(|(_, v)| v.as_str())
///     }
///     fn body(&self) -> Option<&Value> { None }
///     fn annotation(&self, key: &str) -> Option<&str> {
///         self.flash.get(key).map(String::as_str)
///     }
///     fn set_annotation(&mut self, key: &str, value: Option<String>) {
///         match value {
///             Some(v) => { self.flash.insert(key.to_string(), v); }
///             None => { self.flash.remove(key); }
///         }
///     }
/// }
/// ```
pub trait InboundRequest {
    /// Correlation id used in log events.
    fn request_id(&self) -> &str;

    /// Request path, without the query string when the transport split it.
    fn path(&self) -> &str;

    /// Raw query string, if the transport parsed one.
    fn query_string(&self) -> Option<&str>;

    /// Header value by name, case-insensitive.
    fn header(&self, name: &str) -> Option<&str>;

    /// Parsed request body, if any.
    fn body(&self) -> Option<&Value>;

    /// Reads an annotation.
    fn annotation(&self, key: &str) -> Option<&str>;

    /// Writes (`Some`) or clears (`None`) an annotation.
    fn set_annotation(&mut self, key: &str, value: Option<String>);
}
