//! Web framework integration surface.
//!
//! This module is the boundary between HTTP frameworks and the decision
//! engine. It handles:
//! - Describing what the engine reads from a request ([`InboundRequest`])
//! - An owned request type for frameworks without their own adapter ([`RequestAdapter`])
//! - Recovering the requested-for subject from body or path ([`extract_requested_for`])
//!
//! # Design Principles
//!
//! 1. **No Framework Dependencies**: nothing here knows about a concrete HTTP stack.
//! 2. **No Decisions**: the boundary extracts; [`AuthEngine`](crate::AuthEngine) decides.
//! 3. **Per-request state only**: the annotation slot lives on the request value.
//!
//! # Example Flow
//!
//! ```ignore
//! // In a framework-specific integration (e.g., axum, actix):
//! let mut adapter = RequestAdapter::from_uri(request_id, req.uri());
//! for (name, value) in req.headers() {
//!     adapter.add_header(name, value);
//! }
//! adapter.set_body(parsed_json);
//!
//! let outcome = engine.authenticate(&mut adapter)?;
//! if outcome.is_rejected() {
//!     return StatusCode::UNAUTHORIZED.into_response();
//! }
//! ```

mod adapter;
mod extract;
mod requested_for;

pub use adapter::RequestAdapter;
pub use extract::{InboundRequest, CLIENT_ID_HEADER, FOR_TOKEN_HEADER, USER_TOKEN_HEADER};
pub use requested_for::extract_requested_for;
