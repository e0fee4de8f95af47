//! The authentication decision engine.
//!
//! [`AuthEngine`] classifies the request path, then runs one of two protocols:
//!
//! ```text
//! Required path                          Excluded / private path
//! -------------                          -----------------------
//! no token        -> Unauthorized        no token        -> Anonymous
//! token sentinel  -> that sentinel       fault/sentinel  -> Anonymous
//! token ok, no requested-for / equal     token ok        -> subject
//!                 -> subject
//! mismatch, no for-token -> subject
//! mismatch, for-token approved -> subject + managed_for
//! mismatch, for-token rejected -> Unauthorized
//! ```
//!
//! The engine is stateless: it owns only read-only rules and verifiers, so a
//! single instance can be shared behind an `Arc` by every worker.

use crate::error::Error;
use crate::identity::{is_unauthenticated, AuthOutcome, PathClass, MANAGED_FOR};
use crate::logging::DecisionLog;
use crate::paths::{PathClassifier, PathRules};
use crate::secret::Secret;
use crate::verifier::{AccessTokenVerifier, BestEffort, DelegationVerifier, Strict};
use crate::web::{
    extract_requested_for, InboundRequest, CLIENT_ID_HEADER, FOR_TOKEN_HEADER, USER_TOKEN_HEADER,
};

/// Resolves the caller identity of inbound requests.
///
/// # Examples
///
/// ```
/// use identity_gate::web::RequestAdapter;
/// use identity_gate::{
///     AuthEngine, OutcomeKind, PathRules, StaticAccessTokens, StaticDelegations, MANAGED_FOR,
/// };
/// use identity_gate::web::InboundRequest;
/// use serde_json::json;
///
/// let engine = AuthEngine::new(
///     PathRules::default(),
///     StaticAccessTokens::new().with_token("tok-u1", "U1"),
///     StaticDelegations::new().with_grant("for-u2", "U1", "U2"),
/// );
///
/// let mut request = RequestAdapter::new("req-1", "/v1/user/update")
///     .with_header("X-Authenticated-User-Token", "tok-u1")
///     .with_header("X-Authenticated-For", "for-u2")
///     .with_body(json!({"request": {"userId": "U2"}}));
///
/// let outcome = engine.authenticate(&mut request).unwrap();
/// assert_eq!(outcome.kind(), OutcomeKind::Authenticated);
/// assert_eq!(outcome.subject(), "U1");
/// assert_eq!(request.annotation(MANAGED_FOR), Some("U2"));
/// ```
#[derive(Debug, Clone)]
pub struct AuthEngine<A, D, P = PathRules> {
    paths: P,
    access: A,
    delegation: D,
}

impl<A, D, P> AuthEngine<A, D, P>
where
    A: AccessTokenVerifier,
    D: DelegationVerifier,
    P: PathClassifier,
{
    /// Creates an engine from path rules and the two verifiers.
    pub fn new(paths: P, access: A, delegation: D) -> Self {
        Self {
            paths,
            access,
            delegation,
        }
    }

    /// The path classifier in use.
    pub fn paths(&self) -> &P {
        &self.paths
    }

    /// The access-token verifier.
    pub fn access(&self) -> &A {
        &self.access
    }

    /// The delegation verifier.
    pub fn delegation(&self) -> &D {
        &self.delegation
    }

    /// Decides the identity of `request`.
    ///
    /// Clears the [`MANAGED_FOR`] annotation first and sets it again only
    /// after an approved delegation.
    ///
    /// # Errors
    ///
    /// On paths that require authentication, verifier faults propagate as
    /// [`Error::AccessVerifier`] or [`Error::DelegationVerifier`]. Excluded
    /// and private paths never fail.
    pub fn authenticate<R>(&self, request: &mut R) -> Result<AuthOutcome, Error>
    where
        R: InboundRequest + ?Sized,
    {
        request.set_annotation(MANAGED_FOR, None);

        let class = self.paths.classify(request.path());
        let outcome = if class.is_best_effort() {
            self.best_effort(&*request, class)
        } else {
            let (outcome, managed_for) = self.required(&*request)?;
            if let Some(managed_for) = managed_for {
                request.set_annotation(MANAGED_FOR, Some(managed_for));
            }
            outcome
        };

        tracing::debug!(
            request_id = %request.request_id(),
            path = %request.path(),
            path_class = %outcome.path_class(),
            outcome = %outcome.kind(),
            delegated = outcome.managed_for().is_some(),
            "request identity resolved"
        );
        Ok(outcome)
    }

    /// Decides the identity of `request` and returns only the final subject:
    /// a real subject id, [`UNAUTHORIZED`](crate::UNAUTHORIZED) or
    /// [`ANONYMOUS`](crate::ANONYMOUS).
    ///
    /// # Errors
    ///
    /// Same as [`authenticate`](Self::authenticate).
    pub fn resolve_subject<R>(&self, request: &mut R) -> Result<String, Error>
    where
        R: InboundRequest + ?Sized,
    {
        self.authenticate(request).map(AuthOutcome::into_subject)
    }

    /// Mandatory-authentication protocol. Returns the outcome and the
    /// delegated subject to annotate, if any.
    fn required<R>(&self, request: &R) -> Result<(AuthOutcome, Option<String>), Error>
    where
        R: InboundRequest + ?Sized,
    {
        let log = DecisionLog::new(request.request_id(), request.path());

        let Some(token) = request.header(USER_TOKEN_HEADER).map(Secret::<String>::from) else {
            log.debug(format_args!("no access token on a protected path"));
            return Ok((AuthOutcome::unauthorized(PathClass::Required), None));
        };
        if request.header(CLIENT_ID_HEADER).is_some() {
            log.debug(format_args!("client id header present; not used for the decision"));
        }

        let subject = Strict::new(&self.access).verify_access(&token)?;
        if is_unauthenticated(&subject) {
            log.info(format_args!("access token rejected: {subject}"));
            return Ok((AuthOutcome::new(subject, PathClass::Required), None));
        }

        let requested_for = match extract_requested_for(request) {
            Some(requested_for) if requested_for != subject => requested_for,
            _ => {
                log.debug(format_args!("no managed-for target; ignoring delegation token"));
                return Ok((AuthOutcome::new(subject, PathClass::Required), None));
            }
        };

        let Some(for_token) = Secret::from_header(request.header(FOR_TOKEN_HEADER)) else {
            // Lenient mode: a mismatch without a delegation token proceeds as
            // the caller. Kept as-is; see DESIGN.md.
            log.info(format_args!(
                "requested-for subject differs from caller but no delegation token was sent"
            ));
            return Ok((AuthOutcome::new(subject, PathClass::Required), None));
        };

        let managed_for =
            Strict::new(&self.delegation).verify_delegation(&for_token, &subject, &requested_for)?;
        if is_unauthenticated(&managed_for) {
            log.warn(format_args!("delegation rejected for caller {subject}"));
            return Ok((AuthOutcome::unauthorized(PathClass::Required), None));
        }

        log.info(format_args!("caller {subject} acting for {managed_for}"));
        let outcome =
            AuthOutcome::new(subject, PathClass::Required).with_managed_for(managed_for.clone());
        Ok((outcome, Some(managed_for)))
    }

    /// Best-effort protocol for excluded and private paths. Never rejects.
    fn best_effort<R>(&self, request: &R, class: PathClass) -> AuthOutcome
    where
        R: InboundRequest + ?Sized,
    {
        let log = DecisionLog::new(request.request_id(), request.path());

        let Some(token) = request.header(USER_TOKEN_HEADER).map(Secret::<String>::from) else {
            return AuthOutcome::anonymous(class);
        };
        match BestEffort::new(&self.access).verify_access(&token, &log) {
            Some(subject) => AuthOutcome::new(subject, class),
            None => AuthOutcome::anonymous(class),
        }
    }
}
