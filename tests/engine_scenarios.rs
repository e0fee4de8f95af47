//! End-to-end decision scenarios through the public API.
//!
//! Verifiers are scripted fakes that count their calls, so each scenario can
//! assert both the outcome and which external calls were made.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use identity_gate::web::{InboundRequest, RequestAdapter};
use identity_gate::{
    AccessTokenVerifier, AuthEngine, DelegationVerifier, Error, OutcomeKind, PathClass, PathRules,
    VerifierError, ANONYMOUS, MANAGED_FOR, UNAUTHORIZED,
};
use serde_json::json;

const USER_TOKEN: &str = "X-Authenticated-User-Token";
const FOR_TOKEN: &str = "X-Authenticated-For";

/// Scripted access verifier: `"tok-<subject>"` verifies to `<subject>`,
/// `"fault"` raises a fault, anything else is unauthorized.
#[derive(Default)]
struct FakeAccess {
    calls: AtomicUsize,
}

impl AccessTokenVerifier for FakeAccess {
    fn verify(&self, token: &str) -> Result<String, VerifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match token {
            "fault" => Err(VerifierError::new("malformed token")),
            t => Ok(t
                .strip_prefix("tok-")
                .map(str::to_string)
                .unwrap_or_else(|| UNAUTHORIZED.to_string())),
        }
    }
}

/// Scripted delegation verifier answering with a fixed result.
struct FakeDelegation {
    answer: Result<String, VerifierError>,
    calls: AtomicUsize,
    last_args: std::sync::Mutex<Option<(String, String, String)>>,
}

impl FakeDelegation {
    fn answering(answer: Result<String, VerifierError>) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
            last_args: std::sync::Mutex::new(None),
        }
    }

    fn approving(subject: &str) -> Self {
        Self::answering(Ok(subject.to_string()))
    }
}

impl DelegationVerifier for FakeDelegation {
    fn verify(
        &self,
        token: &str,
        owner: &str,
        requested_for: &str,
    ) -> Result<String, VerifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_args.lock() {
            *last = Some((token.into(), owner.into(), requested_for.into()));
        }
        self.answer.clone()
    }
}

fn engine(delegation: FakeDelegation) -> AuthEngine<FakeAccess, FakeDelegation> {
    AuthEngine::new(PathRules::default(), FakeAccess::default(), delegation)
}

fn update_for(user_id: &str) -> RequestAdapter {
    RequestAdapter::new("req-scenario", "/v1/user/update")
        .with_body(json!({"request": {"userId": user_id}}))
}

#[test]
fn scenario_a_health_check_without_token_is_anonymous() {
    let engine = engine(FakeDelegation::approving("U2"));
    let mut req = RequestAdapter::new("req-a", "/service/health");

    let outcome = engine.authenticate(&mut req).unwrap();

    assert_eq!(outcome.subject(), ANONYMOUS);
    assert_eq!(outcome.kind(), OutcomeKind::Anonymous);
    assert_eq!(outcome.path_class(), PathClass::Excluded);
    assert_eq!(engine_access_calls(&engine), 0);
}

#[test]
fn scenario_a_markers_are_lowercase_literals() {
    let engine = engine(FakeDelegation::approving("U2"));

    let mut health = RequestAdapter::new("req-a", "/service/health");
    assert_eq!(engine.resolve_subject(&mut health).unwrap(), "anonymous");

    let mut update = update_for("U1");
    assert_eq!(engine.resolve_subject(&mut update).unwrap(), "unauthorized");
}

#[test]
fn scenario_b_missing_token_is_unauthorized_without_verifier_call() {
    let engine = engine(FakeDelegation::approving("U2"));
    let mut req = update_for("U1");

    let outcome = engine.authenticate(&mut req).unwrap();

    assert_eq!(outcome.subject(), UNAUTHORIZED);
    assert!(outcome.is_rejected());
    assert_eq!(engine_access_calls(&engine), 0);
}

#[test]
fn scenario_c_matching_requested_for_skips_delegation() {
    let engine = engine(FakeDelegation::approving("U2"));
    let mut req = update_for("U1")
        .with_header(USER_TOKEN, "tok-U1")
        .with_header(FOR_TOKEN, "for-token");

    let outcome = engine.authenticate(&mut req).unwrap();

    assert_eq!(outcome.subject(), "U1");
    assert_eq!(outcome.managed_for(), None);
    assert_eq!(req.annotation(MANAGED_FOR), None);
    assert_eq!(engine_delegation_calls(&engine), 0);
}

#[test]
fn scenario_d_approved_delegation_sets_annotation() {
    let engine = engine(FakeDelegation::approving("U2"));
    let mut req = update_for("U2")
        .with_header(USER_TOKEN, "tok-U1")
        .with_header(FOR_TOKEN, "for-token");

    let outcome = engine.authenticate(&mut req).unwrap();

    assert_eq!(outcome.subject(), "U1");
    assert_eq!(outcome.kind(), OutcomeKind::Authenticated);
    assert_eq!(outcome.managed_for(), Some("U2"));
    assert_eq!(req.annotation(MANAGED_FOR), Some("U2"));

    let last = delegation_args(&engine);
    assert_eq!(
        last,
        Some(("for-token".to_string(), "U1".to_string(), "U2".to_string()))
    );
}

#[test]
fn scenario_e_rejected_delegation_is_unauthorized() {
    let engine = engine(FakeDelegation::answering(Ok(UNAUTHORIZED.to_string())));
    let mut req = update_for("U2")
        .with_header(USER_TOKEN, "tok-U1")
        .with_header(FOR_TOKEN, "for-token");

    let outcome = engine.authenticate(&mut req).unwrap();

    assert_eq!(outcome.subject(), UNAUTHORIZED);
    assert!(outcome.is_rejected());
    assert_eq!(req.annotation(MANAGED_FOR), None);
}

#[test]
fn scenario_e_anonymous_delegation_answer_is_also_a_rejection() {
    let engine = engine(FakeDelegation::answering(Ok(ANONYMOUS.to_string())));
    let mut req = update_for("U2")
        .with_header(USER_TOKEN, "tok-U1")
        .with_header(FOR_TOKEN, "for-token");

    assert_eq!(engine.resolve_subject(&mut req).unwrap(), UNAUTHORIZED);
}

#[test]
fn scenario_f_mismatch_without_delegation_header_keeps_caller() {
    let engine = engine(FakeDelegation::approving("U2"));
    let mut req = update_for("U2").with_header(USER_TOKEN, "tok-U1");

    let outcome = engine.authenticate(&mut req).unwrap();

    assert_eq!(outcome.subject(), "U1");
    assert_eq!(req.annotation(MANAGED_FOR), None);
    assert_eq!(engine_delegation_calls(&engine), 0);
}

#[test]
fn empty_access_header_is_passed_to_the_verifier() {
    let engine = engine(FakeDelegation::approving("U2"));
    let mut req = update_for("U1").with_header(USER_TOKEN, "");

    assert_eq!(engine.resolve_subject(&mut req).unwrap(), UNAUTHORIZED);
    assert_eq!(engine_access_calls(&engine), 1);

    let mut health = RequestAdapter::new("req-h", "/health").with_header(USER_TOKEN, "");
    assert_eq!(engine.resolve_subject(&mut health).unwrap(), ANONYMOUS);
    assert_eq!(engine_access_calls(&engine), 2);
}

#[test]
fn empty_delegation_header_is_treated_as_absent() {
    let engine = engine(FakeDelegation::approving("U2"));
    let mut req = update_for("U2")
        .with_header(USER_TOKEN, "tok-U1")
        .with_header(FOR_TOKEN, "");

    assert_eq!(engine.resolve_subject(&mut req).unwrap(), "U1");
    assert_eq!(engine_delegation_calls(&engine), 0);
}

#[test]
fn uuid_read_path_triggers_delegation() {
    let managed = "8c5e2f1a-7b3d-4e9c-a1f2-3b4c5d6e7f80";
    let engine = engine(FakeDelegation::approving(managed));
    let uri = format!("/v1/user/read/{managed}?fields=x");
    let mut req = RequestAdapter::from_uri("req-read", &uri)
        .with_header(USER_TOKEN, "tok-U1")
        .with_header(FOR_TOKEN, "for-token");

    let outcome = engine.authenticate(&mut req).unwrap();

    assert_eq!(outcome.subject(), "U1");
    assert_eq!(req.annotation(MANAGED_FOR), Some(managed));
}

#[test]
fn undashed_hex_segment_is_not_a_delegation_target() {
    let engine = engine(FakeDelegation::answering(Ok(UNAUTHORIZED.to_string())));
    let mut req = RequestAdapter::new("req-read", "/v1/org/read/0123456789abcdef0123456789abcdef")
        .with_header(USER_TOKEN, "tok-U1")
        .with_header(FOR_TOKEN, "for-token");

    assert_eq!(engine.resolve_subject(&mut req).unwrap(), "U1");
    assert_eq!(engine_delegation_calls(&engine), 0);
}

#[test]
fn empty_verified_subject_is_passed_through_without_an_id() {
    let engine = engine(FakeDelegation::approving("U2"));
    let mut req = RequestAdapter::new("req-e", "/v1/user/search").with_header(USER_TOKEN, "tok-");

    let outcome = engine.authenticate(&mut req).unwrap();

    assert_eq!(outcome.subject(), "");
    assert_eq!(outcome.kind(), OutcomeKind::Authenticated);
    assert_eq!(outcome.subject_id(), None);
}

#[test]
fn invalid_access_token_returns_sentinel() {
    let engine = engine(FakeDelegation::approving("U2"));
    let mut req = update_for("U2")
        .with_header(USER_TOKEN, "garbage")
        .with_header(FOR_TOKEN, "for-token");

    assert_eq!(engine.resolve_subject(&mut req).unwrap(), UNAUTHORIZED);
    assert_eq!(engine_delegation_calls(&engine), 0);
}

#[test]
fn access_fault_propagates_on_required_paths() {
    let engine = engine(FakeDelegation::approving("U2"));
    let mut req = update_for("U1").with_header(USER_TOKEN, "fault");

    let err = engine.authenticate(&mut req).unwrap_err();
    assert!(matches!(err, Error::AccessVerifier(_)));
}

#[test]
fn delegation_fault_propagates_on_required_paths() {
    let engine = engine(FakeDelegation::answering(Err(VerifierError::new("expired"))));
    let mut req = update_for("U2")
        .with_header(USER_TOKEN, "tok-U1")
        .with_header(FOR_TOKEN, "for-token");

    let err = engine.authenticate(&mut req).unwrap_err();
    assert!(matches!(err, Error::DelegationVerifier(_)));
    assert_eq!(req.annotation(MANAGED_FOR), None);
}

#[test]
fn access_fault_degrades_to_anonymous_on_excluded_paths() {
    let engine = engine(FakeDelegation::approving("U2"));
    let mut req = RequestAdapter::new("req-h", "/health").with_header(USER_TOKEN, "fault");

    let outcome = engine.authenticate(&mut req).unwrap();
    assert_eq!(outcome.subject(), ANONYMOUS);
    assert_eq!(engine_access_calls(&engine), 1);
}

#[test]
fn valid_token_is_attributed_on_excluded_paths() {
    let engine = engine(FakeDelegation::approving("U2"));
    let mut req = RequestAdapter::new("req-h", "/service/health/ready")
        .with_header(USER_TOKEN, "tok-U1")
        .with_header(FOR_TOKEN, "for-token")
        .with_body(json!({"request": {"userId": "U2"}}));

    let outcome = engine.authenticate(&mut req).unwrap();

    assert_eq!(outcome.subject(), "U1");
    assert_eq!(outcome.path_class(), PathClass::Excluded);
    assert_eq!(req.annotation(MANAGED_FOR), None);
    assert_eq!(engine_delegation_calls(&engine), 0);
}

#[test]
fn best_effort_never_rejects() {
    let engine = engine(FakeDelegation::approving("U2"));
    for token in ["garbage", "tok-Unauthorized", "tok-UNAUTHORIZED", "tok-", "fault"] {
        let mut req =
            RequestAdapter::new("req-p", "/private/user/v1/lookup").with_header(USER_TOKEN, token);
        let outcome = engine.authenticate(&mut req).unwrap();
        assert_eq!(outcome.subject(), ANONYMOUS, "token {token:?}");
        assert!(!outcome.is_rejected());
    }
}

#[test]
fn repeated_decisions_are_identical() {
    let engine = engine(FakeDelegation::approving("U2"));
    let mut req = update_for("U2")
        .with_header(USER_TOKEN, "tok-U1")
        .with_header(FOR_TOKEN, "for-token");

    let first = engine.authenticate(&mut req).unwrap();
    let first_annotation = req.annotation(MANAGED_FOR).map(str::to_string);
    let second = engine.authenticate(&mut req).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_annotation.as_deref(), req.annotation(MANAGED_FOR));
}

#[test]
fn concurrent_requests_do_not_interfere() {
    let engine = Arc::new(engine(FakeDelegation::approving("U2")));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let delegated = i % 2 == 0;
                let mut req = update_for(if delegated { "U2" } else { "U1" })
                    .with_header(USER_TOKEN, "tok-U1")
                    .with_header(FOR_TOKEN, "for-token");
                let outcome = engine.authenticate(&mut req).unwrap();
                (
                    delegated,
                    outcome.subject().to_string(),
                    req.annotation(MANAGED_FOR).map(str::to_string),
                )
            })
        })
        .collect();

    for handle in handles {
        let (delegated, subject, annotation) = handle.join().unwrap();
        assert_eq!(subject, "U1");
        assert_eq!(annotation.as_deref(), delegated.then_some("U2"));
    }
}

fn engine_access_calls(engine: &AuthEngine<FakeAccess, FakeDelegation>) -> usize {
    engine.access().calls.load(Ordering::SeqCst)
}

fn engine_delegation_calls(engine: &AuthEngine<FakeAccess, FakeDelegation>) -> usize {
    engine.delegation().calls.load(Ordering::SeqCst)
}

fn delegation_args(
    engine: &AuthEngine<FakeAccess, FakeDelegation>,
) -> Option<(String, String, String)> {
    engine.delegation().last_args.lock().unwrap().clone()
}
