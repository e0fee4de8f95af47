//! Token verifier seams and the strict / best-effort calling contract.
//!
//! The verifiers themselves are external: token formats, signatures and
//! transports live behind [`AccessTokenVerifier`] and [`DelegationVerifier`].
//! A verifier answers with a subject id, or with one of the
//! [unauthenticated sentinels](crate::UNAUTHENTICATED_SENTINELS) when it
//! rejects the token. `Err` is reserved for faults.
//!
//! How a fault is handled depends on the path being served, and that choice
//! is made explicit by the adapter used to call the verifier:
//! - [`Strict`] propagates faults as [`Error`]
//! - [`BestEffort`] swallows faults and reports no identity

use std::collections::HashMap;

use crate::error::{Error, VerifierError};
use crate::identity::{is_unauthenticated, UNAUTHORIZED};
use crate::logging::DecisionLog;
use crate::secret::Secret;

/// Verifies a primary access token.
///
/// Must be safe to call from many threads at once. Calls may block.
pub trait AccessTokenVerifier: Send + Sync {
    /// Returns the subject the token was issued to, or a sentinel.
    fn verify(&self, token: &str) -> Result<String, VerifierError>;
}

/// Verifies a delegation ("managed-for") token.
pub trait DelegationVerifier: Send + Sync {
    /// Returns the delegated subject if `token` proves that `owner` may act
    /// for `requested_for`, or a sentinel.
    fn verify(&self, token: &str, owner: &str, requested_for: &str)
        -> Result<String, VerifierError>;
}

impl<F> AccessTokenVerifier for F
where
    F: Fn(&str) -> Result<String, VerifierError> + Send + Sync,
{
    fn verify(&self, token: &str) -> Result<String, VerifierError> {
        self(token)
    }
}

impl<F> DelegationVerifier for F
where
    F: Fn(&str, &str, &str) -> Result<String, VerifierError> + Send + Sync,
{
    fn verify(
        &self,
        token: &str,
        owner: &str,
        requested_for: &str,
    ) -> Result<String, VerifierError> {
        self(token, owner, requested_for)
    }
}

/// Calls a verifier on a path where authentication is mandatory.
///
/// Faults propagate; the boundary layer maps them to a rejection.
#[derive(Debug)]
pub struct Strict<'a, V: ?Sized> {
    verifier: &'a V,
}

impl<'a, V: ?Sized> Strict<'a, V> {
    /// Wraps a verifier.
    pub fn new(verifier: &'a V) -> Self {
        Self { verifier }
    }
}

impl<V: AccessTokenVerifier + ?Sized> Strict<'_, V> {
    /// Verifies an access token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AccessVerifier`] if the verifier faults.
    pub fn verify_access(&self, token: &Secret<String>) -> Result<String, Error> {
        self.verifier
            .verify(token.expose_secret())
            .map_err(Error::AccessVerifier)
    }
}

impl<V: DelegationVerifier + ?Sized> Strict<'_, V> {
    /// Verifies a delegation token for the `owner` → `requested_for` pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DelegationVerifier`] if the verifier faults.
    pub fn verify_delegation(
        &self,
        token: &Secret<String>,
        owner: &str,
        requested_for: &str,
    ) -> Result<String, Error> {
        self.verifier
            .verify(token.expose_secret(), owner, requested_for)
            .map_err(Error::DelegationVerifier)
    }
}

/// Calls a verifier on a path where identity is optional.
///
/// Faults and the unauthorized marker both degrade to "no identity".
#[derive(Debug)]
pub struct BestEffort<'a, V: ?Sized> {
    verifier: &'a V,
}

impl<'a, V: ?Sized> BestEffort<'a, V> {
    /// Wraps a verifier.
    pub fn new(verifier: &'a V) -> Self {
        Self { verifier }
    }
}

impl<V: AccessTokenVerifier + ?Sized> BestEffort<'_, V> {
    /// Verifies an access token. Faults are logged at error level and
    /// reported as `None`, as is the unauthorized marker in any letter case.
    pub fn verify_access(&self, token: &Secret<String>, log: &DecisionLog<'_>) -> Option<String> {
        match self.verifier.verify(token.expose_secret()) {
            Ok(subject) if subject.eq_ignore_ascii_case(UNAUTHORIZED) => None,
            Ok(subject) if subject.trim().is_empty() => None,
            Ok(subject) => Some(subject),
            Err(err) => {
                log.error(format_args!("access token verification faulted: {err}"));
                None
            }
        }
    }
}

/// In-memory access-token verifier backed by a fixed token table.
///
/// Unknown tokens verify to [`UNAUTHORIZED`].
///
/// # Examples
///
/// ```
/// use identity_gate::{AccessTokenVerifier, StaticAccessTokens, UNAUTHORIZED};
///
/// let tokens = StaticAccessTokens::new().with_token("tok-1", "U1");
/// assert_eq!(tokens.verify("tok-1").unwrap(), "U1");
/// assert_eq!(tokens.verify("nope").unwrap(), UNAUTHORIZED);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticAccessTokens {
    tokens: HashMap<String, String>,
}

impl StaticAccessTokens {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token for a subject.
    pub fn with_token(mut self, token: impl Into<String>, subject: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), subject.into());
        self
    }
}

impl AccessTokenVerifier for StaticAccessTokens {
    fn verify(&self, token: &str) -> Result<String, VerifierError> {
        Ok(self
            .tokens
            .get(token)
            .cloned()
            .unwrap_or_else(|| UNAUTHORIZED.to_string()))
    }
}

#[derive(Debug, Clone)]
struct Grant {
    owner: String,
    managed: String,
}

/// In-memory delegation verifier.
///
/// A token is honoured only for the exact owner and managed subject it was
/// granted for; anything else verifies to [`UNAUTHORIZED`].
///
/// # Examples
///
/// ```
/// use identity_gate::{DelegationVerifier, StaticDelegations, UNAUTHORIZED};
///
/// let grants = StaticDelegations::new().with_grant("for-1", "U1", "U2");
/// assert_eq!(grants.verify("for-1", "U1", "U2").unwrap(), "U2");
/// assert_eq!(grants.verify("for-1", "U3", "U2").unwrap(), UNAUTHORIZED);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticDelegations {
    grants: HashMap<String, Grant>,
}

impl StaticDelegations {
    /// Creates an empty grant table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token letting `owner` act for `managed`.
    pub fn with_grant(
        mut self,
        token: impl Into<String>,
        owner: impl Into<String>,
        managed: impl Into<String>,
    ) -> Self {
        self.grants.insert(
            token.into(),
            Grant {
                owner: owner.into(),
                managed: managed.into(),
            },
        );
        self
    }
}

impl DelegationVerifier for StaticDelegations {
    fn verify(
        &self,
        token: &str,
        owner: &str,
        requested_for: &str,
    ) -> Result<String, VerifierError> {
        let subject = match self.grants.get(token) {
            Some(grant)
                if grant.owner == owner
                    && grant.managed == requested_for
                    && !is_unauthenticated(&grant.managed) =>
            {
                grant.managed.clone()
            }
            _ => UNAUTHORIZED.to_string(),
        };
        Ok(subject)
    }
}
