//! The session store: credential, resolved user, and tri-state status.
//!
//! DESIGN
//! ======
//! Single source of truth for session state, held in a `RwSignal<AuthState>`
//! provided via context so tests can construct isolated instances. All writes
//! are whole-value replacements, so concurrent identity fetches converge to
//! whichever response lands last. The request client and route guard only
//! ever read the credential; they signal failure upward instead of mutating
//! the store themselves.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use serde::{Deserialize, Serialize};

use crate::net::types::User;

/// localStorage key for the durable session snapshot. Shared by every tab of
/// the origin; last writer wins.
pub const STORAGE_KEY: &str = "auth";

/// Session status. `Loading` only during initial storage rehydration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthStatus {
    #[default]
    Loading,
    Authenticated,
    Unauthenticated,
}

/// Client-held session tuple.
///
/// Invariants: `Authenticated` iff a credential is present;
/// `Unauthenticated` implies credential and user are both absent.
#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub token: Option<String>,
    pub user: Option<User>,
    pub status: AuthStatus,
    /// True once the durable-storage read has completed, successfully or not.
    /// Until then, `status` must not be trusted.
    pub hydrated: bool,
    redirecting: bool,
}

/// Durable snapshot written to localStorage on every credential change.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl PersistedSession {
    #[must_use]
    pub fn to_storage_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_owned())
    }

    /// Decode a stored snapshot. Corrupt JSON reads as no session.
    #[must_use]
    pub fn from_storage_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

impl AuthState {
    /// Store a credential. Empty or absent tokens resolve to an
    /// unauthenticated session, which also drops any cached user.
    pub fn set_token(&mut self, token: Option<String>) {
        let token = token.filter(|t| !t.is_empty());
        if token.is_some() {
            self.status = AuthStatus::Authenticated;
        } else {
            self.status = AuthStatus::Unauthenticated;
            self.user = None;
        }
        self.token = token;
    }

    /// Replace the user summary wholesale. Status is untouched.
    pub fn set_user(&mut self, user: Option<User>) {
        self.user = user;
    }

    /// Drop credential and user. Idempotent; calling on an already-cleared
    /// store observes the same state.
    pub fn clear_token(&mut self) {
        self.token = None;
        self.user = None;
        self.status = AuthStatus::Unauthenticated;
    }

    /// One-way latch coalescing the auth-failure reaction. Returns `true`
    /// exactly once; concurrent 401s after the first are no-ops, so only one
    /// navigation to the login entry point ever happens.
    pub fn begin_auth_failure(&mut self) -> bool {
        if self.redirecting {
            return false;
        }
        self.redirecting = true;
        true
    }

    /// Apply the result of the one-time durable-storage read. Storage that is
    /// unavailable or corrupt reads as `None` and resolves to unauthenticated.
    pub fn complete_hydration(&mut self, restored: Option<PersistedSession>) {
        if self.hydrated {
            return;
        }
        match restored {
            Some(snapshot) => {
                self.set_token(snapshot.token);
                if self.status == AuthStatus::Authenticated {
                    self.user = snapshot.user;
                }
            }
            None => self.clear_token(),
        }
        self.hydrated = true;
    }

    #[must_use]
    pub fn snapshot(&self) -> PersistedSession {
        PersistedSession { token: self.token.clone(), user: self.user.clone() }
    }
}
