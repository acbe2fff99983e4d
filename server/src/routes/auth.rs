//! Auth routes — signup/login, Google OAuth exchange, session lifecycle.

use axum::extract::{FromRef, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use time::Duration;

use crate::guard;
use crate::services::{auth as auth_svc, session};
use crate::state::AppState;

/// Short-lived cookie holding the OAuth CSRF state between redirect and
/// callback.
const OAUTH_STATE_COOKIE_NAME: &str = "oauth_state";

/// `Secure` cookies break plain-HTTP local development; opt in via env.
pub(crate) fn cookie_secure() -> bool {
    std::env::var("COOKIE_SECURE").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Expired replacement for the CSRF state cookie. Attached to every callback
/// response, success or failure, so the state value is single-use.
pub(crate) fn expired_oauth_state_cookie() -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cookie_secure())
        .max_age(Duration::ZERO)
        .build()
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user extracted from the bearer credential.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: session::SessionUser,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Authorization header first; the client's cookie mirror second.
        let token = guard::bearer_token(&parts.headers)
            .map(str::to_owned)
            .or_else(|| {
                CookieJar::from_headers(&parts.headers)
                    .get(guard::TOKEN_COOKIE)
                    .map(Cookie::value)
                    .map(str::to_owned)
            })
            .unwrap_or_default();
        if token.is_empty() {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, &token)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(Self { user, token })
    }
}

// =============================================================================
// PAYLOADS
// =============================================================================

/// Response for login/signup/OAuth exchange: the user summary plus the
/// bearer credential the client persists.
#[derive(Serialize)]
pub struct AuthResponse {
    pub user: session::SessionUser,
    pub token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// The Google exchange carries the authorization code in a `token` field,
/// matching the callback contract of the web client.
#[derive(Deserialize)]
pub struct GooglePayload {
    pub token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    pub current_password: String,
    pub new_password: String,
}

/// Validate a signup payload, returning the normalized email.
pub(crate) fn validate_signup(payload: &SignupPayload) -> Result<String, &'static str> {
    if payload.name.trim().is_empty() {
        return Err("name required");
    }
    let Some(email) = auth_svc::normalize_email(&payload.email) else {
        return Err("invalid email");
    };
    if !auth_svc::acceptable_password(&payload.password) {
        return Err("password too short");
    }
    Ok(email)
}

fn user_from_row(row: &sqlx::postgres::PgRow) -> session::SessionUser {
    session::SessionUser {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        profile_picture: row.get("profile_picture"),
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/auth/signup` — create a user and open a session.
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> Result<Json<AuthResponse>, (StatusCode, &'static str)> {
    let email = validate_signup(&payload).map_err(|msg| (StatusCode::BAD_REQUEST, msg))?;

    let salt = auth_svc::generate_salt();
    let hash = auth_svc::hash_password(&payload.password, &salt);

    let row = sqlx::query(
        r"INSERT INTO users (name, email, password_hash, password_salt, age, gender, profile_picture)
          VALUES ($1, $2, $3, $4, $5, $6, $7)
          RETURNING id, name, email, profile_picture",
    )
    .bind(payload.name.trim())
    .bind(&email)
    .bind(&hash)
    .bind(&salt)
    .bind(payload.age)
    .bind(&payload.gender)
    .bind(&payload.profile_picture)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => (StatusCode::CONFLICT, "email already registered"),
        _ => {
            tracing::error!(error = %e, "user insert failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to create user")
        }
    })?;

    let user = user_from_row(&row);
    let token = session::create_session(&state.pool, user.id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "session creation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to create session")
        })?;

    Ok(Json(AuthResponse { user, token }))
}

/// `POST /api/auth/login` — verify credentials and open a session.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, (StatusCode, &'static str)> {
    const REJECT: (StatusCode, &str) = (StatusCode::UNAUTHORIZED, "invalid email or password");

    let Some(email) = auth_svc::normalize_email(&payload.email) else {
        return Err(REJECT);
    };

    let row = sqlx::query(
        r"SELECT id, name, email, profile_picture, password_hash, password_salt
          FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&state.pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "user lookup failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "login failed")
    })?
    .ok_or(REJECT)?;

    let hash: Option<String> = row.get("password_hash");
    let salt: Option<String> = row.get("password_salt");
    let verified = match (hash, salt) {
        (Some(hash), Some(salt)) => auth_svc::verify_password(&payload.password, &salt, &hash),
        // OAuth-only accounts have no password credential.
        _ => false,
    };
    if !verified {
        return Err(REJECT);
    }

    let user = user_from_row(&row);
    let token = session::create_session(&state.pool, user.id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "session creation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to create session")
        })?;

    Ok(Json(AuthResponse { user, token }))
}

/// `POST /api/auth/google` — exchange an OAuth code, upsert the user, open a
/// session. The client folds the response into its store via the callback
/// reconciler.
pub async fn google(
    State(state): State<AppState>,
    Json(payload): Json<GooglePayload>,
) -> Result<Json<AuthResponse>, (StatusCode, &'static str)> {
    let Some(config) = &state.google else {
        return Err((StatusCode::SERVICE_UNAVAILABLE, "Google OAuth not configured"));
    };

    let access_token = auth_svc::exchange_code(config, &payload.token)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "oauth code exchange failed");
            (StatusCode::BAD_GATEWAY, "OAuth code exchange failed")
        })?;

    let profile = auth_svc::fetch_google_user(&access_token).await.map_err(|e| {
        tracing::error!(error = %e, "google profile fetch failed");
        (StatusCode::BAD_GATEWAY, "failed to fetch Google profile")
    })?;

    let user_id = auth_svc::upsert_google_user(&state.pool, &profile)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "user upsert failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to create user")
        })?;

    let row = sqlx::query("SELECT id, name, email, profile_picture FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(&state.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "user fetch failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to load user")
        })?;

    let user = user_from_row(&row);
    let token = session::create_session(&state.pool, user.id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "session creation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to create session")
        })?;

    Ok(Json(AuthResponse { user, token }))
}

// =============================================================================
// GOOGLE REDIRECT FLOW
// =============================================================================

/// `GET /auth/google` — redirect to the Google authorization page.
pub async fn google_redirect(State(state): State<AppState>) -> Response {
    let Some(config) = &state.google else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Google OAuth not configured").into_response();
    };

    let oauth_state = session::generate_token();
    let cookie = Cookie::build((OAUTH_STATE_COOKIE_NAME, oauth_state.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cookie_secure())
        .max_age(Duration::minutes(10));

    let jar = CookieJar::new().add(cookie);
    (jar, Redirect::temporary(&config.authorize_url(&oauth_state))).into_response()
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    code: String,
    state: Option<String>,
}

/// `GET /auth/google/callback` — exchange the code, upsert the user, open a
/// session, then hand the session to the client through the redirect URL
/// (`/?token=...&user=...`). The client's callback reconciler folds it into
/// the store and cleans the address bar.
pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackQuery>,
) -> Response {
    let Some(config) = &state.google else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Google OAuth not configured").into_response();
    };

    // The state value is single-use: whatever happens next, the cookie
    // leaves this handler expired.
    let expected_state = jar
        .get(OAUTH_STATE_COOKIE_NAME)
        .map(|c| c.value().to_owned())
        .unwrap_or_default();
    let jar = jar.add(expired_oauth_state_cookie());

    let Some(callback_state) = params.state.as_deref() else {
        return (jar, (StatusCode::BAD_REQUEST, "missing oauth state")).into_response();
    };
    if expected_state.is_empty() || expected_state != callback_state {
        return (jar, (StatusCode::UNAUTHORIZED, "invalid oauth state")).into_response();
    }

    let access_token = match auth_svc::exchange_code(config, &params.code).await {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "oauth code exchange failed");
            return (jar, (StatusCode::BAD_GATEWAY, "OAuth code exchange failed")).into_response();
        }
    };

    let profile = match auth_svc::fetch_google_user(&access_token).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "google profile fetch failed");
            return (jar, (StatusCode::BAD_GATEWAY, "failed to fetch Google profile")).into_response();
        }
    };

    let user_id = match auth_svc::upsert_google_user(&state.pool, &profile).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(error = %e, "user upsert failed");
            return (jar, (StatusCode::INTERNAL_SERVER_ERROR, "failed to create user")).into_response();
        }
    };

    let row = match sqlx::query("SELECT id, name, email, profile_picture FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(&state.pool)
        .await
    {
        Ok(row) => row,
        Err(e) => {
            tracing::error!(error = %e, "user fetch failed");
            return (jar, (StatusCode::INTERNAL_SERVER_ERROR, "failed to load user")).into_response();
        }
    };
    let user = user_from_row(&row);

    let token = match session::create_session(&state.pool, user.id).await {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "session creation failed");
            return (jar, (StatusCode::INTERNAL_SERVER_ERROR, "failed to create session")).into_response();
        }
    };

    let destination = callback_destination(&token, &user);
    (jar, Redirect::temporary(&destination)).into_response()
}

/// SPA landing URL carrying the fresh session as query parameters.
pub(crate) fn callback_destination(token: &str, user: &session::SessionUser) -> String {
    let user_json = serde_json::to_string(user).unwrap_or_else(|_| "{}".to_owned());
    format!(
        "/?token={}&user={}",
        urlencoding::encode(token),
        urlencoding::encode(&user_json)
    )
}

/// `GET /api/auth/me` — return the current user summary.
pub async fn me(auth: AuthUser) -> Json<session::SessionUser> {
    Json(auth.user)
}

/// `POST /api/auth/logout` — revoke the session server-side.
/// Best effort: the client clears its local session regardless.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(e) = session::delete_session(&state.pool, &auth.token).await {
        tracing::warn!(error = %e, "server-side session revocation failed");
    }
    StatusCode::NO_CONTENT
}

/// `PUT /api/auth/update-password` — rotate the password credential.
///
/// A wrong current password is 403, not 401: a 401 would make the client
/// treat its (still valid) session as terminated.
pub async fn update_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<Json<serde_json::Value>, (StatusCode, &'static str)> {
    if !auth_svc::acceptable_password(&payload.new_password) {
        return Err((StatusCode::BAD_REQUEST, "password too short"));
    }

    let row = sqlx::query("SELECT password_hash, password_salt FROM users WHERE id = $1")
        .bind(auth.user.id)
        .fetch_one(&state.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "credential lookup failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "password update failed")
        })?;

    let hash: Option<String> = row.get("password_hash");
    let salt: Option<String> = row.get("password_salt");
    let verified = match (hash, salt) {
        (Some(hash), Some(salt)) => auth_svc::verify_password(&payload.current_password, &salt, &hash),
        _ => false,
    };
    if !verified {
        return Err((StatusCode::FORBIDDEN, "current password incorrect"));
    }

    let new_salt = auth_svc::generate_salt();
    let new_hash = auth_svc::hash_password(&payload.new_password, &new_salt);
    sqlx::query("UPDATE users SET password_hash = $1, password_salt = $2, updated_at = now() WHERE id = $3")
        .bind(&new_hash)
        .bind(&new_salt)
        .bind(auth.user.id)
        .execute(&state.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password update failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "password update failed")
        })?;

    Ok(Json(serde_json::json!({ "message": "password updated" })))
}

/// `DELETE /api/auth/delete` — delete the account. Sessions cascade.
pub async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<StatusCode, (StatusCode, &'static str)> {
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(auth.user.id)
        .execute(&state.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "account deletion failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "account deletion failed")
        })?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
