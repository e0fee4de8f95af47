//! Caller identity resolution for multi-tenant API requests.
//!
//! This crate decides, for every inbound request, who the caller is and
//! whether the request may proceed:
//! - **Authenticated**: the caller presents an access token
//! - **Delegated**: the caller acts "managed-for" another user, proven by a
//!   second token
//! - **Anonymous**: allowed only on public (excluded) and private (internal) paths
//!
//! Token verification itself is external; the crate consumes it through
//! [`AccessTokenVerifier`] and [`DelegationVerifier`].
//!
//! # Core Types
//!
//! - [`AuthEngine`]: runs the decision protocol for a request
//! - [`AuthOutcome`]: final subject, its [`OutcomeKind`] and any delegated subject
//! - [`PathRules`]: exclude list plus private marker, built from [`AuthConfig`]
//! - [`web::RequestAdapter`]: owned request implementing [`web::InboundRequest`]
//! - [`Secret`]: keeps tokens out of logs
//!
//! # Examples
//!
//! ```
//! use identity_gate::web::RequestAdapter;
//! use identity_gate::{
//!     AuthConfig, AuthEngine, StaticAccessTokens, StaticDelegations, ANONYMOUS, UNAUTHORIZED,
//! };
//!
//! let rules = AuthConfig::default().path_rules().expect("default config is valid");
//! let engine = AuthEngine::new(
//!     rules,
//!     StaticAccessTokens::new().with_token("tok-u1", "U1"),
//!     StaticDelegations::new(),
//! );
//!
//! let mut health = RequestAdapter::new("req-1", "/service/health");
//! assert_eq!(engine.resolve_subject(&mut health).unwrap(), ANONYMOUS);
//!
//! let mut read = RequestAdapter::new("req-2", "/v1/user/read");
//! assert_eq!(engine.resolve_subject(&mut read).unwrap(), UNAUTHORIZED);
//!
//! let mut read = RequestAdapter::new("req-3", "/v1/user/read")
//!     .with_header("X-Authenticated-User-Token", "tok-u1");
//! assert_eq!(engine.resolve_subject(&mut read).unwrap(), "U1");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod identity;
mod logging;
mod paths;
mod secret;
mod verifier;
pub mod web;

pub use config::AuthConfig;
pub use engine::AuthEngine;
pub use error::{Error, VerifierError};
pub use identity::{
    is_unauthenticated, AuthOutcome, OutcomeKind, PathClass, ANONYMOUS, MANAGED_FOR,
    UNAUTHENTICATED_SENTINELS, UNAUTHORIZED,
};
pub use logging::DecisionLog;
pub use paths::{
    ExcludeList, PathClassifier, PathRules, PrivateMarker, DEFAULT_EXCLUDED_PATHS,
    DEFAULT_PRIVATE_MARKER,
};
pub use secret::Secret;
pub use verifier::{
    AccessTokenVerifier, BestEffort, DelegationVerifier, StaticAccessTokens, StaticDelegations,
    Strict,
};
