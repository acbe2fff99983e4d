use super::*;
use crate::state::auth::{AuthStatus, PersistedSession};

fn hydrated_with_token(token: &str) -> AuthState {
    let mut state = AuthState::default();
    state.complete_hydration(Some(PersistedSession {
        token: Some(token.to_owned()),
        user: None,
    }));
    state
}

fn sample_user() -> User {
    User { id: "u1".to_owned(), name: "Ann".to_owned(), ..User::default() }
}

// =============================================================================
// activate
// =============================================================================

#[test]
fn activate_waits_for_storage_read() {
    let mut hydrator = SessionHydrator::default();
    let state = AuthState::default();
    assert!(!hydrator.activate(&state));
    assert_eq!(hydrator.phase(), HydrationPhase::Idle);
}

#[test]
fn activate_fetches_when_credential_present() {
    let mut hydrator = SessionHydrator::default();
    let state = hydrated_with_token("abc");
    assert!(hydrator.activate(&state));
    assert_eq!(hydrator.phase(), HydrationPhase::FetchingIdentity);
}

#[test]
fn activate_resolves_ready_without_credential() {
    let mut hydrator = SessionHydrator::default();
    let mut state = AuthState::default();
    state.complete_hydration(None);
    assert!(!hydrator.activate(&state));
    assert_eq!(hydrator.phase(), HydrationPhase::Ready);
}

#[test]
fn activate_fires_at_most_once() {
    let mut hydrator = SessionHydrator::default();
    let state = hydrated_with_token("abc");
    assert!(hydrator.activate(&state));
    // The driving effect re-runs on every store change.
    assert!(!hydrator.activate(&state));
    assert!(!hydrator.activate(&state));
    assert_eq!(hydrator.phase(), HydrationPhase::FetchingIdentity);
}

#[test]
fn activate_is_inert_after_ready() {
    let mut hydrator = SessionHydrator::default();
    let mut state = AuthState::default();
    state.complete_hydration(None);
    hydrator.activate(&state);

    // A later login stores a credential, but revalidation belongs to boot
    // only; the fresh token was just issued by the server.
    state.set_token(Some("fresh".to_owned()));
    assert!(!hydrator.activate(&state));
    assert_eq!(hydrator.phase(), HydrationPhase::Ready);
}

// =============================================================================
// settle
// =============================================================================

#[test]
fn settle_success_refreshes_user_and_keeps_session() {
    let mut hydrator = SessionHydrator::default();
    let mut state = hydrated_with_token("abc");
    hydrator.activate(&state);

    let phase = hydrator.settle(&mut state, Ok(sample_user()));
    assert_eq!(phase, HydrationPhase::Ready);
    assert_eq!(state.status, AuthStatus::Authenticated);
    assert_eq!(state.token.as_deref(), Some("abc"));
    assert_eq!(state.user.as_ref().unwrap().name, "Ann");
}

#[test]
fn settle_auth_failure_clears_session() {
    let mut hydrator = SessionHydrator::default();
    let mut state = hydrated_with_token("stale");
    hydrator.activate(&state);

    let phase = hydrator.settle(&mut state, Err(ApiError::AuthFailure));
    assert_eq!(phase, HydrationPhase::FailedAndCleared);
    assert_eq!(state.status, AuthStatus::Unauthenticated);
    assert!(state.token.is_none());
    assert!(state.user.is_none());
}

#[test]
fn settle_network_failure_also_clears() {
    // An unreachable identity endpoint must not leave a possibly-dead
    // credential rendering authenticated UI.
    let mut hydrator = SessionHydrator::default();
    let mut state = hydrated_with_token("abc");
    hydrator.activate(&state);

    let phase = hydrator.settle(&mut state, Err(ApiError::Network("offline".to_owned())));
    assert_eq!(phase, HydrationPhase::FailedAndCleared);
    assert_eq!(state.status, AuthStatus::Unauthenticated);
}

#[test]
fn settle_without_activation_is_a_no_op() {
    let mut hydrator = SessionHydrator::default();
    let mut state = hydrated_with_token("abc");

    let phase = hydrator.settle(&mut state, Ok(sample_user()));
    assert_eq!(phase, HydrationPhase::Idle);
    assert!(state.user.is_none());
}

#[test]
fn settle_is_terminal() {
    let mut hydrator = SessionHydrator::default();
    let mut state = hydrated_with_token("abc");
    hydrator.activate(&state);
    hydrator.settle(&mut state, Ok(sample_user()));

    // A duplicate resolution (cancelled-then-landed response) changes nothing.
    let phase = hydrator.settle(&mut state, Err(ApiError::AuthFailure));
    assert_eq!(phase, HydrationPhase::Ready);
    assert_eq!(state.status, AuthStatus::Authenticated);
}
