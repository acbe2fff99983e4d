//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the database pool and the optional Google OAuth configuration.
//! Session data itself lives in Postgres; nothing here caches credentials.

use sqlx::PgPool;

use crate::services::auth::GoogleConfig;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum — all inner fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub google: Option<GoogleConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, google: Option<GoogleConfig>) -> Self {
        Self { pool, google }
    }
}
