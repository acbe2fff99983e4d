//! Request-time route guard and security headers.
//!
//! DESIGN
//! ======
//! Runs before every handler. A fixed prefix list marks paths as protected;
//! requests without a valid session credential get a redirect to `/login` for
//! page paths and a 401 for API paths. The fixed security header set is
//! attached to every mediated response, allowed or denied. The guard holds no
//! session state of its own; it only validates what the request presents.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use crate::services::session;
use crate::state::AppState;

/// Cookie the client mirrors its bearer token into, so plain page navigations
/// (which carry no Authorization header) can be gated too.
pub const TOKEN_COOKIE: &str = "token";

const PROTECTED_PAGES: [&str; 4] = ["/dashboard", "/settings", "/profile", "/user"];
const PROTECTED_APIS: [&str; 4] = [
    "/api/user",
    "/api/auth/me",
    "/api/auth/update-password",
    "/api/auth/delete",
];

pub(crate) const SECURITY_HEADERS: [(&str, &str); 5] = [
    ("x-xss-protection", "1; mode=block"),
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    (
        "content-security-policy",
        "default-src 'self'; script-src 'self' 'unsafe-eval' 'unsafe-inline'; \
         style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; font-src 'self' data:;",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Protection {
    /// Not gated; still gets security headers.
    Open,
    /// Gated; denial redirects to the login entry point.
    Page,
    /// Gated; denial returns 401.
    Api,
}

fn prefix_match(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Classify a request path against the protected prefix lists.
/// Matching is segment-aware: `/userx` does not match the `/user` prefix.
pub(crate) fn protection(path: &str) -> Protection {
    if PROTECTED_APIS.iter().any(|p| prefix_match(path, p)) {
        return Protection::Api;
    }
    if PROTECTED_PAGES.iter().any(|p| prefix_match(path, p)) {
        return Protection::Page;
    }
    Protection::Open
}

/// Extract the bearer token from the Authorization header, if present.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
}

pub(crate) fn apply_security_headers(headers: &mut HeaderMap) {
    for (name, value) in SECURITY_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
}

/// Axum middleware: allow/deny protected paths, then stamp security headers.
pub async fn guard(State(state): State<AppState>, jar: CookieJar, req: Request, next: Next) -> Response {
    let class = protection(req.uri().path());

    let mut response = match class {
        Protection::Open => next.run(req).await,
        Protection::Page | Protection::Api => {
            let token = bearer_token(req.headers())
                .map(str::to_owned)
                .or_else(|| jar.get(TOKEN_COOKIE).map(|c| c.value().to_owned()))
                .filter(|t| !t.is_empty());

            let valid = match token {
                Some(t) => session::validate_session(&state.pool, &t)
                    .await
                    .unwrap_or_else(|e| {
                        tracing::error!(error = %e, "session validation failed");
                        None
                    })
                    .is_some(),
                None => false,
            };

            if valid {
                next.run(req).await
            } else if class == Protection::Api {
                StatusCode::UNAUTHORIZED.into_response()
            } else {
                Redirect::temporary("/login").into_response()
            }
        }
    };

    apply_security_headers(response.headers_mut());
    response
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
