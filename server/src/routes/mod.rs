//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the auth and user-directory API under a single Axum router with the
//! route guard wrapped around everything, so protected paths are gated and
//! every response carries the fixed security header set. The web client is
//! rendered server-side via Leptos SSR and hydrated in the browser; its
//! compiled assets are served from the site root's `pkg` directory.

pub mod auth;
pub mod users;

use std::path::PathBuf;

use axum::Router;
use axum::routing::{delete, get, post, put};
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::guard;
use crate::state::AppState;

/// Full application router: API routes, guard, headers, Leptos SSR pages.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded.
pub fn app(state: AppState) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    // Compiled client assets (WASM, JS, CSS) from the site root.
    let site_root = PathBuf::from(leptos_options.site_root.as_ref());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/google", post(auth::google))
        .route("/auth/google", get(auth::google_redirect))
        .route("/auth/google/callback", get(auth::google_callback))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/update-password", put(auth::update_password))
        .route("/api/auth/delete", delete(auth::delete_account))
        .route("/api/user", get(users::list_users))
        .route("/api/user/search", get(users::search_users))
        .route(
            "/api/user/{id}",
            get(users::user_profile).put(users::update_profile),
        )
        .route("/healthz", get(healthz))
        .with_state(state.clone());

    Ok(api
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root.join("pkg")))
        .layer(axum::middleware::from_fn_with_state(state, guard::guard))
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

async fn healthz() -> &'static str {
    "ok"
}
