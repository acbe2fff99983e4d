//! Credential service — password hashing, Google OAuth exchange, user upsert.

use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::session::bytes_to_hex;

const MIN_PASSWORD_LEN: usize = 8;

/// Normalize an email address to its canonical lowercase form.
/// Returns `None` for anything that is not a plausible `local@domain`.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return None;
    }
    let parts = normalized.split('@').collect::<Vec<_>>();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return None;
    }
    Some(normalized)
}

/// Minimum-length check. Strength policy is out of scope here.
#[must_use]
pub fn acceptable_password(password: &str) -> bool {
    password.len() >= MIN_PASSWORD_LEN
}

/// Generate a random 16-byte hex salt for a new credential.
#[must_use]
pub fn generate_salt() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Hash a password with its salt: hex(sha256(salt || password)).
#[must_use]
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    bytes_to_hex(&hasher.finalize())
}

/// Verify a password attempt against the stored salt + hash.
#[must_use]
pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    hash_password(password, salt) == expected_hash
}

// =============================================================================
// GOOGLE OAUTH
// =============================================================================

/// Google OAuth configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl GoogleConfig {
    /// Load from `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`,
    /// `GOOGLE_REDIRECT_URI`. Returns `None` if any are missing
    /// (the exchange endpoint will report unavailable).
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var("GOOGLE_CLIENT_ID").ok()?;
        let client_secret = std::env::var("GOOGLE_CLIENT_SECRET").ok()?;
        let redirect_uri = std::env::var("GOOGLE_REDIRECT_URI").ok()?;
        Some(Self { client_id, client_secret, redirect_uri })
    }

    /// Google authorization URL carrying the CSRF `state` value.
    #[must_use]
    pub fn authorize_url(&self, state: &str) -> String {
        format!(
            "https://accounts.google.com/o/oauth2/v2/auth\
             ?client_id={}&redirect_uri={}&response_type=code\
             &scope=openid%20email%20profile&state={}",
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(state),
        )
    }
}

#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Profile fields returned by the Google userinfo endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct GoogleUser {
    pub sub: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("google token exchange failed: {0}")]
    TokenExchange(String),
    #[error("google api error: {0}")]
    GoogleApi(String),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Exchange an OAuth authorization code for an access token.
pub async fn exchange_code(config: &GoogleConfig, code: &str) -> Result<String, AuthError> {
    let client = reqwest::Client::new();
    let resp = client
        .post("https://oauth2.googleapis.com/token")
        .form(&[
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

    let body = resp
        .text()
        .await
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;
    let token_resp: TokenResponse =
        serde_json::from_str(&body).map_err(|_| AuthError::TokenExchange(format!("unexpected response: {body}")))?;
    Ok(token_resp.access_token)
}

/// Fetch the authenticated Google user's profile.
pub async fn fetch_google_user(access_token: &str) -> Result<GoogleUser, AuthError> {
    let client = reqwest::Client::new();
    let resp = client
        .get("https://openidconnect.googleapis.com/v1/userinfo")
        .header("Authorization", format!("Bearer {access_token}"))
        .send()
        .await
        .map_err(|e| AuthError::GoogleApi(e.to_string()))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(AuthError::GoogleApi(format!("{status}: {body}")));
    }

    resp.json::<GoogleUser>()
        .await
        .map_err(|e| AuthError::GoogleApi(e.to_string()))
}

/// Upsert a user from their Google profile. Returns the user's UUID.
pub async fn upsert_google_user(pool: &PgPool, profile: &GoogleUser) -> Result<Uuid, AuthError> {
    let name = profile
        .name
        .clone()
        .unwrap_or_else(|| profile.email.split('@').next().unwrap_or("user").to_owned());
    let row = sqlx::query(
        r"INSERT INTO users (google_id, name, email, profile_picture)
          VALUES ($1, $2, $3, $4)
          ON CONFLICT (google_id) DO UPDATE
              SET name = EXCLUDED.name, profile_picture = EXCLUDED.profile_picture, updated_at = now()
          RETURNING id",
    )
    .bind(&profile.sub)
    .bind(&name)
    .bind(&profile.email)
    .bind(&profile.picture)
    .fetch_one(pool)
    .await?;
    Ok(row.get("id"))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
