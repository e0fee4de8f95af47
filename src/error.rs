use thiserror::Error;

/// Errors that can occur while resolving a request identity.
///
/// Verification *failures* (an unknown or expired token) are not errors: verifiers
/// report them through sentinel subjects and the engine turns them into an
/// [`AuthOutcome`](crate::AuthOutcome). Only verifier faults and configuration
/// problems surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// The access-token verifier faulted on a path that requires authentication.
    #[error("access token verifier failed: {0}")]
    AccessVerifier(#[source] VerifierError),

    /// The delegation verifier faulted while checking a managed-for token.
    #[error("delegation verifier failed: {0}")]
    DelegationVerifier(#[source] VerifierError),

    /// The configuration document could not be parsed.
    #[error("invalid auth configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// The configuration parsed but violates a constraint.
    #[error("invalid auth configuration: {0}")]
    InvalidConfig(String),
}

/// A fault raised inside a verifier call (transport failure, malformed token, ...).
///
/// This is distinct from a verifier *rejecting* a token, which is reported
/// through the sentinel return channel.
///
/// # Examples
///
/// ```
/// use identity_gate::VerifierError;
///
/// let err = VerifierError::new("token endpoint unreachable");
/// assert_eq!(err.to_string(), "token endpoint unreachable");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct VerifierError {
    message: String,
}

impl VerifierError {
    /// Creates a verifier fault with a human-readable message.
    ///
    /// The message must not contain token material; it ends up in logs.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the fault message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
