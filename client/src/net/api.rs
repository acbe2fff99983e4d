//! REST client for the AuthWeb API.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net` with the bearer
//! credential injected from the session store. Server-side (SSR): stubs
//! returning errors since these endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! A 401 on an authenticated endpoint is session termination: the store is
//! cleared and the browser navigates to `/login`, coalesced through the
//! store's one-way latch so concurrent in-flight requests produce a single
//! navigation. Every other error class passes through to the caller
//! unmodified; nothing here retries.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use leptos::prelude::*;

use crate::net::types::{AuthResponse, LoginData, SignupData, User, UserListResponse, UserProfile};
use crate::state::auth::AuthState;

/// Error classes surfaced to callers.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server rejected the credential. The session has already been
    /// cleared and the redirect scheduled by the time callers see this.
    #[error("authentication rejected")]
    AuthFailure,
    #[error("request failed with status {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

pub(crate) const AUTH_FAILURE_STATUS: u16 = 401;

/// Whether a response status signals a rejected credential.
#[must_use]
pub(crate) fn is_auth_failure(status: u16) -> bool {
    status == AUTH_FAILURE_STATUS
}

#[must_use]
pub(crate) fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Directory listing parameters. Sort fields are whitelisted here as well as
/// on the server, so a stale UI value never even leaves the client.
#[derive(Clone, Debug, Default)]
pub struct UserListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

pub(crate) const SORT_FIELDS: [&str; 5] = ["id", "name", "email", "createdAt", "updatedAt"];

impl UserListParams {
    /// Render as a query string (no leading `?`); empty when nothing is set.
    #[must_use]
    pub fn to_query(&self) -> String {
        let mut pairs: Vec<String> = Vec::new();
        if let Some(page) = self.page {
            pairs.push(format!("page={page}"));
        }
        if let Some(limit) = self.limit {
            pairs.push(format!("limit={limit}"));
        }
        if let Some(sort) = self.sort.as_deref() {
            if SORT_FIELDS.contains(&sort) {
                pairs.push(format!("sort={sort}"));
            }
        }
        if let Some(order) = self.order.as_deref() {
            if order == "asc" || order == "desc" {
                pairs.push(format!("order={order}"));
            }
        }
        pairs.join("&")
    }
}

// =============================================================================
// BROWSER TRANSPORT
// =============================================================================

#[cfg(feature = "hydrate")]
mod http {
    use gloo_net::http::{Request, RequestBuilder, Response};
    use leptos::prelude::*;

    use super::{ApiError, bearer, is_auth_failure};
    use crate::state::auth::AuthState;

    pub(super) fn with_bearer(req: RequestBuilder, auth: RwSignal<AuthState>) -> RequestBuilder {
        match auth.with_untracked(|a| a.token.clone()) {
            Some(token) => req.header("Authorization", &bearer(&token)),
            None => req,
        }
    }

    /// Coalesced session-termination reaction for rejected credentials:
    /// clear the store and storage, navigate at most once.
    pub(super) fn react_to_auth_failure(auth: RwSignal<AuthState>) {
        let first = auth
            .try_update(|a| {
                a.clear_token();
                a.begin_auth_failure()
            })
            .unwrap_or(false);
        crate::util::browser::clear_session();
        if first {
            crate::util::browser::redirect_to_login();
        }
    }

    /// Map a response into the shared error taxonomy. `authenticated` marks
    /// endpoints where a 401 means the session itself is dead.
    pub(super) fn check(auth: RwSignal<AuthState>, resp: Response, authenticated: bool) -> Result<Response, ApiError> {
        if authenticated && is_auth_failure(resp.status()) {
            react_to_auth_failure(auth);
            return Err(ApiError::AuthFailure);
        }
        if !resp.ok() {
            return Err(ApiError::Status(resp.status()));
        }
        Ok(resp)
    }

    pub(super) async fn get_json<T: serde::de::DeserializeOwned>(
        auth: RwSignal<AuthState>,
        url: &str,
    ) -> Result<T, ApiError> {
        let resp = with_bearer(Request::get(url), auth)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check(auth, resp, true)?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

// =============================================================================
// SESSION ENDPOINTS
// =============================================================================

/// `GET /api/auth/me` — fetch the identity record for the stored credential.
pub async fn fetch_me(auth: RwSignal<AuthState>) -> Result<User, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        http::get_json(auth, "/api/auth/me").await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = auth;
        Err(ApiError::Network("not available on server".to_owned()))
    }
}

/// `POST /api/auth/login`. A 401 here means wrong credentials, not a dead
/// session, so it passes through as a plain status error.
pub async fn login(credentials: &LoginData) -> Result<AuthResponse, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post("/api/auth/login")
            .json(credentials)
            .map_err(|e| ApiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if !resp.ok() {
            return Err(ApiError::Status(resp.status()));
        }
        resp.json::<AuthResponse>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = credentials;
        Err(ApiError::Network("not available on server".to_owned()))
    }
}

/// `POST /api/auth/signup`.
pub async fn signup(data: &SignupData) -> Result<AuthResponse, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post("/api/auth/signup")
            .json(data)
            .map_err(|e| ApiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if !resp.ok() {
            return Err(ApiError::Status(resp.status()));
        }
        resp.json::<AuthResponse>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = data;
        Err(ApiError::Network("not available on server".to_owned()))
    }
}

/// `POST /api/auth/google` — exchange an OAuth authorization code.
pub async fn google_exchange(code: &str) -> Result<AuthResponse, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post("/api/auth/google")
            .json(&serde_json::json!({ "token": code }))
            .map_err(|e| ApiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if !resp.ok() {
            return Err(ApiError::Status(resp.status()));
        }
        resp.json::<AuthResponse>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = code;
        Err(ApiError::Network("not available on server".to_owned()))
    }
}

/// `POST /api/auth/logout` — best-effort server-side invalidation. Failure is
/// logged and ignored; local clearing never waits on it.
pub async fn logout(auth: RwSignal<AuthState>) {
    #[cfg(feature = "hydrate")]
    {
        let result = http::with_bearer(gloo_net::http::Request::post("/api/auth/logout"), auth)
            .send()
            .await;
        match result {
            Ok(resp) if resp.ok() => {}
            Ok(resp) => log::warn!("logout endpoint returned {}", resp.status()),
            Err(e) => log::warn!("logout request failed: {e}"),
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = auth;
    }
}

/// `PUT /api/auth/update-password`.
pub async fn change_password(
    auth: RwSignal<AuthState>,
    current_password: &str,
    new_password: &str,
) -> Result<(), ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let body = serde_json::json!({
            "currentPassword": current_password,
            "newPassword": new_password,
        });
        let resp = http::with_bearer(gloo_net::http::Request::put("/api/auth/update-password"), auth)
            .json(&body)
            .map_err(|e| ApiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        http::check(auth, resp, true).map(|_| ())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (auth, current_password, new_password);
        Err(ApiError::Network("not available on server".to_owned()))
    }
}

/// `DELETE /api/auth/delete` — delete the account. Callers clear the local
/// session on success.
pub async fn delete_account(auth: RwSignal<AuthState>) -> Result<(), ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = http::with_bearer(gloo_net::http::Request::delete("/api/auth/delete"), auth)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        http::check(auth, resp, true).map(|_| ())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = auth;
        Err(ApiError::Network("not available on server".to_owned()))
    }
}

// =============================================================================
// USER DIRECTORY ENDPOINTS
// =============================================================================

/// `GET /api/user` — paginated directory listing.
pub async fn fetch_users(auth: RwSignal<AuthState>, params: &UserListParams) -> Result<UserListResponse, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let query = params.to_query();
        let url = if query.is_empty() {
            "/api/user".to_owned()
        } else {
            format!("/api/user?{query}")
        };
        http::get_json(auth, &url).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (auth, params);
        Err(ApiError::Network("not available on server".to_owned()))
    }
}

/// `GET /api/user/search?q=`.
pub async fn search_users(auth: RwSignal<AuthState>, term: &str) -> Result<UserListResponse, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let url = format!("/api/user/search?q={}", urlencoding::encode(term));
        http::get_json(auth, &url).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (auth, term);
        Err(ApiError::Network("not available on server".to_owned()))
    }
}

/// `GET /api/user/{id}`.
pub async fn fetch_profile(auth: RwSignal<AuthState>, user_id: &str) -> Result<UserProfile, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let url = format!("/api/user/{user_id}");
        http::get_json(auth, &url).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (auth, user_id);
        Err(ApiError::Network("not available on server".to_owned()))
    }
}
