//! # client
//!
//! Leptos + WASM front end for the AuthWeb authentication portal.
//!
//! This crate owns the client-side session lifecycle: the session store and
//! its localStorage persistence, the hydration hook that reconciles a stored
//! credential with the identity endpoint, the bearer-injecting request client,
//! and the OAuth callback reconciler. Pages are thin consumers of that state.

pub mod app;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
