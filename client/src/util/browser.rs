//! Browser storage and navigation glue.
//!
//! DESIGN
//! ======
//! All `web-sys` access lives here so the rest of the crate stays portable.
//! Every function degrades to a no-op (or `None`) when the browser API is
//! unavailable: storage can be disabled by the user agent, and the SSR build
//! has no window at all. A missing storage read is indistinguishable from an
//! absent session on purpose.
//!
//! Alongside localStorage the credential is mirrored into a `token` cookie so
//! the server can gate full-page navigations to protected routes before any
//! script runs. The cookie carries the same opaque value the Authorization
//! header does.

use crate::state::auth::PersistedSession;

pub const LOGIN_PATH: &str = "/login";

#[cfg(feature = "hydrate")]
mod imp {
    use web_sys::wasm_bindgen::JsCast;

    use super::LOGIN_PATH;
    use crate::state::auth::{PersistedSession, STORAGE_KEY};

    const TOKEN_COOKIE: &str = "token";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    fn set_cookie(value: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Ok(html) = document.dyn_into::<web_sys::HtmlDocument>() else {
            return;
        };
        if let Err(e) = html.set_cookie(value) {
            log::warn!("failed to write session cookie: {e:?}");
        }
    }

    pub(super) fn load_session() -> Option<PersistedSession> {
        let raw = storage()?.get_item(STORAGE_KEY).ok().flatten()?;
        let restored = PersistedSession::from_storage_json(&raw);
        if restored.is_none() {
            log::warn!("discarding corrupt session snapshot");
            clear_session();
        }
        restored
    }

    pub(super) fn store_session(snapshot: &PersistedSession) {
        if let Some(storage) = storage() {
            if storage.set_item(STORAGE_KEY, &snapshot.to_storage_json()).is_err() {
                log::warn!("failed to persist session snapshot");
            }
        }
        match snapshot.token.as_deref() {
            Some(token) => set_cookie(&format!("{TOKEN_COOKIE}={token}; path=/; SameSite=Lax")),
            None => expire_cookie(),
        }
    }

    pub(super) fn clear_session() {
        if let Some(storage) = storage() {
            let _ = storage.remove_item(STORAGE_KEY);
        }
        expire_cookie();
    }

    fn expire_cookie() {
        set_cookie(&format!(
            "{TOKEN_COOKIE}=; path=/; SameSite=Lax; expires=Thu, 01 Jan 1970 00:00:00 GMT"
        ));
    }

    pub(super) fn redirect_to_login() {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(LOGIN_PATH);
        }
    }

    pub(super) fn current_search() -> Option<String> {
        web_sys::window()?.location().search().ok()
    }

    pub(super) fn replace_url(url: &str) {
        let Some(window) = web_sys::window() else { return };
        let Ok(history) = window.history() else { return };
        let _ = history.replace_state_with_url(&web_sys::wasm_bindgen::JsValue::NULL, "", Some(url));
    }
}

/// Read the persisted session snapshot, clearing it if corrupt.
#[must_use]
pub fn load_session() -> Option<PersistedSession> {
    #[cfg(feature = "hydrate")]
    {
        imp::load_session()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

/// Persist the snapshot and mirror the credential into the `token` cookie.
pub fn store_session(snapshot: &PersistedSession) {
    #[cfg(feature = "hydrate")]
    imp::store_session(snapshot);
    #[cfg(not(feature = "hydrate"))]
    let _ = snapshot;
}

/// Remove the persisted snapshot and expire the cookie mirror.
pub fn clear_session() {
    #[cfg(feature = "hydrate")]
    imp::clear_session();
}

/// Hard navigation to the login entry point.
pub fn redirect_to_login() {
    #[cfg(feature = "hydrate")]
    imp::redirect_to_login();
}

/// The current location's query string, leading `?` included.
#[must_use]
pub fn current_search() -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        imp::current_search()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

/// Replace the current history entry without reloading.
pub fn replace_url(url: &str) {
    #[cfg(feature = "hydrate")]
    imp::replace_url(url);
    #[cfg(not(feature = "hydrate"))]
    let _ = url;
}
