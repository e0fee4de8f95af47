//! Identity markers and the result of an authentication decision.

use std::fmt;

/// Marker returned when a request must be rejected.
///
/// Verifiers use the same value to signal a failed verification, so it shares
/// the return channel with real subject ids. Never treat it as a subject.
pub const UNAUTHORIZED: &str = "unauthorized";

/// Marker returned for requests that carry no usable identity on paths that
/// do not require one.
pub const ANONYMOUS: &str = "anonymous";

/// Subjects a verifier may answer with that do not name a real identity.
pub const UNAUTHENTICATED_SENTINELS: [&str; 2] = [UNAUTHORIZED, ANONYMOUS];

/// Annotation slot carrying the delegated ("managed-for") subject to
/// downstream handlers.
pub const MANAGED_FOR: &str = "managed_for";

/// Returns true if `subject` is one of the unauthenticated sentinels.
///
/// Comparison is exact; `"Unauthorized"` is not a sentinel here.
///
/// # Examples
///
/// ```
/// use identity_gate::{is_unauthenticated, UNAUTHORIZED};
///
/// assert!(is_unauthenticated(UNAUTHORIZED));
/// assert!(!is_unauthenticated("7f9c1a2e-user"));
/// ```
pub fn is_unauthenticated(subject: &str) -> bool {
    UNAUTHENTICATED_SENTINELS.contains(&subject)
}

/// How a request path was classified before any token work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathClass {
    /// Authentication is mandatory.
    Required,
    /// Public endpoint from the exclude list.
    Excluded,
    /// Internal endpoint.
    Private,
}

impl PathClass {
    /// Returns true when the best-effort protocol applies.
    pub fn is_best_effort(self) -> bool {
        !matches!(self, PathClass::Required)
    }
}

impl fmt::Display for PathClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathClass::Required => write!(f, "required"),
            PathClass::Excluded => write!(f, "excluded"),
            PathClass::Private => write!(f, "private"),
        }
    }
}

/// Classification of a final subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    /// A real subject id was resolved.
    Authenticated,
    /// No identity; allowed only because the path does not require one.
    Anonymous,
    /// The request must be rejected.
    Unauthorized,
}

impl OutcomeKind {
    fn of(subject: &str) -> Self {
        match subject {
            UNAUTHORIZED => OutcomeKind::Unauthorized,
            ANONYMOUS => OutcomeKind::Anonymous,
            _ => OutcomeKind::Authenticated,
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeKind::Authenticated => write!(f, "authenticated"),
            OutcomeKind::Anonymous => write!(f, "anonymous"),
            OutcomeKind::Unauthorized => write!(f, "unauthorized"),
        }
    }
}

/// The identity decision for one request.
///
/// # Examples
///
/// ```
/// use identity_gate::{AuthOutcome, OutcomeKind, PathClass};
///
/// let outcome = AuthOutcome::new("user-1", PathClass::Required);
/// assert_eq!(outcome.kind(), OutcomeKind::Authenticated);
/// assert_eq!(outcome.subject_id(), Some("user-1"));
///
/// let rejected = AuthOutcome::unauthorized(PathClass::Required);
/// assert!(rejected.is_rejected());
/// assert_eq!(rejected.subject_id(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    subject: String,
    kind: OutcomeKind,
    managed_for: Option<String>,
    path_class: PathClass,
}

impl AuthOutcome {
    /// Builds an outcome whose kind is derived from `subject`.
    pub fn new(subject: impl Into<String>, path_class: PathClass) -> Self {
        let subject = subject.into();
        Self {
            kind: OutcomeKind::of(&subject),
            subject,
            managed_for: None,
            path_class,
        }
    }

    /// The rejection outcome.
    pub fn unauthorized(path_class: PathClass) -> Self {
        Self::new(UNAUTHORIZED, path_class)
    }

    /// The anonymous outcome.
    pub fn anonymous(path_class: PathClass) -> Self {
        Self::new(ANONYMOUS, path_class)
    }

    /// Attaches an approved delegated subject.
    pub(crate) fn with_managed_for(mut self, managed_for: String) -> Self {
        self.managed_for = Some(managed_for);
        self
    }

    /// The final subject string: a real id or one of the markers.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The subject id, only when it names a real identity.
    ///
    /// A verifier that answers with an empty subject still yields an
    /// [`Authenticated`](OutcomeKind::Authenticated) outcome, but it has no
    /// subject id.
    pub fn subject_id(&self) -> Option<&str> {
        match self.kind {
            OutcomeKind::Authenticated if !self.subject.is_empty() => Some(&self.subject),
            _ => None,
        }
    }

    /// Consumes the outcome, returning the final subject string.
    pub fn into_subject(self) -> String {
        self.subject
    }

    /// The classification of the final subject.
    pub fn kind(&self) -> OutcomeKind {
        self.kind
    }

    /// The delegated subject, present only after an approved escalation.
    pub fn managed_for(&self) -> Option<&str> {
        self.managed_for.as_deref()
    }

    /// How the request path was classified.
    pub fn path_class(&self) -> PathClass {
        self.path_class
    }

    /// True when the boundary layer must answer with a rejection status.
    pub fn is_rejected(&self) -> bool {
        self.kind == OutcomeKind::Unauthorized
    }
}
