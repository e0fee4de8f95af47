//! Recovering the subject a request acts on behalf of.
//!
//! Write-style calls (create, update, search) carry it in the body at
//! `request.userId`; read-style calls carry it as a UUID in the last path
//! segment. Absence is always valid and means no delegation target.

use serde_json::Value;
use uuid::Uuid;

use super::InboundRequest;

const REQUEST_FIELD: &str = "request";
const USER_ID_FIELD: &str = "userId";

/// Offsets of the dashes in `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`.
const UUID_DASHES: [usize; 4] = [8, 13, 18, 23];
const UUID_LEN: usize = 36;

/// Returns the requested-for subject, or `None` when the request asserts none.
///
/// Never fails: a missing body field or a non-UUID trailing segment both
/// yield `None`.
///
/// # Examples
///
/// ```
/// use identity_gate::web::{extract_requested_for, RequestAdapter};
/// use serde_json::json;
///
/// let update = RequestAdapter::new("req-1", "/v1/user/update")
///     .with_body(json!({"request": {"userId": "U2"}}));
/// assert_eq!(extract_requested_for(&update).as_deref(), Some("U2"));
///
/// let read = RequestAdapter::new("req-2", "/v1/user/read/5D1A9E2C-8B3F-4C7A-9E21-0F6B3C2D1A4E");
/// assert_eq!(
///     extract_requested_for(&read).as_deref(),
///     Some("5d1a9e2c-8b3f-4c7a-9e21-0f6b3c2d1a4e"),
/// );
///
/// let search = RequestAdapter::new("req-3", "/v1/user/search");
/// assert_eq!(extract_requested_for(&search), None);
/// ```
pub fn extract_requested_for<R: InboundRequest + ?Sized>(request: &R) -> Option<String> {
    match request.body() {
        Some(body) => from_body(body),
        None => from_path(request.path(), request.request_id()),
    }
}

fn from_body(body: &Value) -> Option<String> {
    let user_id = body.get(REQUEST_FIELD)?.get(USER_ID_FIELD)?;
    let text = match user_id {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn from_path(path: &str, request_id: &str) -> Option<String> {
    // Transports that did not split the query string leave it on the path.
    let path = path.split('?').next().unwrap_or_default();
    let segment = path.rsplit('/').find(|s| !s.is_empty())?;
    if !is_hyphenated(segment) {
        tracing::debug!(
            request_id = %request_id,
            "last path segment is not a hyphenated user id; no requested-for subject"
        );
        return None;
    }
    match Uuid::parse_str(segment) {
        Ok(id) => Some(id.hyphenated().to_string()),
        Err(err) => {
            tracing::debug!(
                request_id = %request_id,
                %err,
                "last path segment is not a user id; no requested-for subject"
            );
            None
        }
    }
}

/// Only the dashed form names a user; simple, braced and urn forms do not.
fn is_hyphenated(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == UUID_LEN && UUID_DASHES.iter().all(|&i| bytes[i] == b'-')
}
