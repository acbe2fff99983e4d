//! External-callback reconciliation.
//!
//! DESIGN
//! ======
//! OAuth providers that complete on the server hand the session back through
//! the redirect URL: `?token=<credential>&user=<percent-encoded JSON>`. On
//! boot, before hydration, the shell inspects the query string; a valid pair
//! seeds the store and is stripped from the address bar so a reload does not
//! replay it. Anything malformed is logged and ignored, and the normal
//! storage-hydration path takes over.
//!
//! The parsing is pure and string-in, so it tests natively; only
//! `reconcile_from_url` touches the browser.

#[cfg(test)]
#[path = "callback_test.rs"]
mod callback_test;

use crate::net::types::User;

/// Result of inspecting a query string for callback parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// No callback parameters present; nothing to do.
    Absent,
    /// Parameters present but unusable (missing half of the pair, bad
    /// percent-encoding, or invalid user JSON).
    Malformed,
    Parsed(CallbackPayload),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackPayload {
    pub token: String,
    pub user: User,
}

fn query_param(search: &str, name: &str) -> Option<String> {
    let search = search.strip_prefix('?').unwrap_or(search);
    for pair in search.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        if key == name {
            return urlencoding::decode(value).ok().map(|v| v.into_owned());
        }
    }
    None
}

/// Inspect a query string for the `token`/`user` callback pair. Both must be
/// present and the user JSON valid, else the outcome is unusable.
#[must_use]
pub fn parse_callback(search: &str) -> CallbackOutcome {
    let token = query_param(search, "token");
    let user = query_param(search, "user");
    if token.is_none() && user.is_none() {
        return CallbackOutcome::Absent;
    }
    let (Some(token), Some(user)) = (token, user) else {
        return CallbackOutcome::Malformed;
    };
    if token.is_empty() {
        return CallbackOutcome::Malformed;
    }
    match serde_json::from_str::<User>(&user) {
        Ok(user) => CallbackOutcome::Parsed(CallbackPayload { token, user }),
        Err(_) => CallbackOutcome::Malformed,
    }
}

/// Rebuild the visible URL with the callback parameters removed. The path and
/// any fragment survive untouched.
pub(crate) fn cleaned_url(path: &str, search: &str, hash: &str) -> String {
    format!("{path}{}{hash}", strip_callback_params(search))
}

/// Rebuild a query string with the callback parameters removed. Returns the
/// remaining query with its leading `?`, or an empty string when nothing is
/// left.
#[must_use]
pub fn strip_callback_params(search: &str) -> String {
    let search = search.strip_prefix('?').unwrap_or(search);
    let kept: Vec<&str> = search
        .split('&')
        .filter(|pair| {
            let key = pair.split_once('=').map_or(*pair, |(k, _)| k);
            !pair.is_empty() && key != "token" && key != "user"
        })
        .collect();
    if kept.is_empty() {
        String::new()
    } else {
        format!("?{}", kept.join("&"))
    }
}

/// Seed the store from the current URL if it carries a valid callback pair,
/// then clean the address bar. Runs before storage hydration so the fresh
/// credential wins over any stale snapshot.
#[cfg(feature = "hydrate")]
pub fn reconcile_from_url(auth: leptos::prelude::RwSignal<crate::state::auth::AuthState>) {
    use leptos::prelude::*;

    let Some(search) = crate::util::browser::current_search() else {
        return;
    };
    match parse_callback(&search) {
        CallbackOutcome::Absent => {}
        CallbackOutcome::Malformed => {
            log::warn!("ignoring malformed auth callback parameters");
        }
        CallbackOutcome::Parsed(payload) => {
            auth.update(|a| {
                a.set_token(Some(payload.token));
                a.set_user(Some(payload.user));
            });
            auth.with_untracked(|a| crate::util::browser::store_session(&a.snapshot()));
            let path = web_sys::window()
                .and_then(|w| w.location().pathname().ok())
                .unwrap_or_else(|| "/".to_owned());
            let hash = web_sys::window()
                .and_then(|w| w.location().hash().ok())
                .unwrap_or_default();
            crate::util::browser::replace_url(&cleaned_url(&path, &search, &hash));
        }
    }
}

#[cfg(not(feature = "hydrate"))]
pub fn reconcile_from_url(_auth: leptos::prelude::RwSignal<crate::state::auth::AuthState>) {}
