//! Session hydration: restore-from-storage, identity revalidation, and the
//! `use_auth` hook consuming views read.
//!
//! DESIGN
//! ======
//! The boot sequence is storage-first: the app shell restores the persisted
//! snapshot synchronously (so a returning visitor renders authenticated
//! immediately), then this module revalidates the credential against the
//! identity endpoint exactly once. The revalidation lifecycle is a pure state
//! machine (`SessionHydrator`) kept free of browser types so it tests
//! natively; the hook wires it to signals and the network.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use leptos::prelude::*;

use crate::net::api::ApiError;
use crate::net::types::User;
use crate::state::auth::AuthState;

/// Lifecycle of the one-shot identity revalidation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HydrationPhase {
    /// Waiting for the storage read to complete.
    #[default]
    Idle,
    /// Identity fetch in flight.
    FetchingIdentity,
    /// Revalidation finished (or there was no credential to validate).
    Ready,
    /// The server rejected the stored credential; the session was cleared.
    FailedAndCleared,
}

/// One-shot revalidation machine. `activate` fires at most once per instance;
/// re-running the driving effect after the phase has advanced is a no-op.
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionHydrator {
    phase: HydrationPhase,
}

impl SessionHydrator {
    #[must_use]
    pub fn phase(&self) -> HydrationPhase {
        self.phase
    }

    /// Decide whether an identity fetch should start for the given store
    /// state. Returns `true` exactly once, and only after the storage read has
    /// completed with a credential present.
    pub fn activate(&mut self, state: &AuthState) -> bool {
        if self.phase != HydrationPhase::Idle || !state.hydrated {
            return false;
        }
        if state.token.is_some() {
            self.phase = HydrationPhase::FetchingIdentity;
            true
        } else {
            self.phase = HydrationPhase::Ready;
            false
        }
    }

    /// Apply the identity fetch result. Success refreshes the cached user
    /// wholesale; any failure terminates the session, since a credential that
    /// cannot be revalidated must not keep rendering authenticated UI.
    pub fn settle(&mut self, state: &mut AuthState, result: Result<User, ApiError>) -> HydrationPhase {
        if self.phase != HydrationPhase::FetchingIdentity {
            return self.phase;
        }
        match result {
            Ok(user) => {
                state.set_user(Some(user));
                self.phase = HydrationPhase::Ready;
            }
            Err(_) => {
                state.clear_token();
                self.phase = HydrationPhase::FailedAndCleared;
            }
        }
        self.phase
    }
}

/// What views get back from [`use_auth`].
#[derive(Clone, Copy)]
pub struct AuthHandle {
    pub user: Signal<Option<User>>,
    /// True until both the storage read and the identity revalidation have
    /// settled. Guarded pages must not redirect while this holds.
    pub loading: Signal<bool>,
}

/// Reactive session accessor. Reads the store from context and drives the
/// one-shot revalidation as a side effect of the first subscription.
#[must_use]
pub fn use_auth() -> AuthHandle {
    let auth = expect_context::<RwSignal<AuthState>>();
    let hydrator = StoredValue::new(SessionHydrator::default());
    let fetching = RwSignal::new(false);

    Effect::new(move |_| {
        let snapshot = auth.get();
        let should_fetch = hydrator
            .try_update_value(|h| h.activate(&snapshot))
            .unwrap_or(false);
        if !should_fetch {
            return;
        }
        fetching.set(true);
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let result = crate::net::api::fetch_me(auth).await;
            let was_auth_failure = matches!(result, Err(ApiError::AuthFailure));
            let phase = hydrator
                .try_update_value(|h| {
                    auth.try_update(|a| h.settle(a, result))
                        .unwrap_or(HydrationPhase::Idle)
                })
                .unwrap_or(HydrationPhase::Idle);
            if phase == HydrationPhase::FailedAndCleared && !was_auth_failure {
                // Auth failures were already cleared and redirected by the
                // request client; only other failure classes are handled here.
                crate::util::browser::clear_session();
                if auth.try_update(AuthState::begin_auth_failure).unwrap_or(false) {
                    crate::util::browser::redirect_to_login();
                }
            }
            fetching.set(false);
        });
    });

    AuthHandle {
        user: Signal::derive(move || auth.with(|a| a.user.clone())),
        loading: Signal::derive(move || auth.with(|a| !a.hydrated) || fetching.get()),
    }
}

/// End the session everywhere: best-effort server invalidation, local clear,
/// then back to the login entry point.
pub fn sign_out(auth: RwSignal<AuthState>) {
    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        crate::net::api::logout(auth).await;
    });
    auth.update(AuthState::clear_token);
    crate::util::browser::clear_session();
    crate::util::browser::redirect_to_login();
}
