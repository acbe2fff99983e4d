//! User directory routes — list, search, profile, self-service update.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use sqlx::Row;
use uuid::Uuid;

use super::auth::AuthUser;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;
// Keeps (page - 1) * limit inside i64 for any whitelisted limit.
const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

// =============================================================================
// QUERY SANITATION
// =============================================================================

/// Map a requested sort field to a real column. Only whitelisted fields are
/// ever interpolated into SQL; anything else falls back to `created_at`.
pub(crate) fn sort_column(raw: Option<&str>) -> &'static str {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        Some("id") => "id",
        Some("name") => "name",
        Some("email") => "email",
        Some("updatedat" | "updated_at") => "updated_at",
        // "createdat"/"created_at" fall through to the same default.
        _ => "created_at",
    }
}

pub(crate) fn order_direction(raw: Option<&str>) -> &'static str {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        Some("desc") => "DESC",
        _ => "ASC",
    }
}

pub(crate) fn clamp_page(raw: Option<i64>) -> i64 {
    raw.filter(|p| *p >= 1).unwrap_or(1).min(MAX_PAGE)
}

pub(crate) fn clamp_limit(raw: Option<i64>) -> i64 {
    raw.filter(|l| *l >= 1).unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE)
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_users: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// Compute the pagination envelope for a result window.
pub(crate) fn page_info(total_users: i64, page: i64, limit: i64) -> PaginationInfo {
    let total_pages = if total_users == 0 { 0 } else { (total_users + limit - 1) / limit };
    PaginationInfo {
        current_page: page,
        total_pages,
        total_users,
        has_next_page: page < total_pages,
        has_prev_page: page > 1 && total_pages > 0,
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub profile_picture: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserRecord>,
    pub pagination: PaginationInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

const USER_COLUMNS: &str = r"id, name, email, age, gender, profile_picture,
    to_char(created_at, 'YYYY-MM-DD') AS created_at,
    to_char(updated_at, 'YYYY-MM-DD') AS updated_at";

fn record_from_row(row: &sqlx::postgres::PgRow) -> UserRecord {
    UserRecord {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        age: row.get("age"),
        gender: row.get("gender"),
        profile_picture: row.get("profile_picture"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/user` — paginated directory listing.
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<UserListResponse>, StatusCode> {
    let page = clamp_page(query.page);
    let limit = clamp_limit(query.limit);
    let sort = sort_column(query.sort.as_deref());
    let dir = order_direction(query.order.as_deref());

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&state.pool)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    // sort/dir come from the whitelists above, never from raw input.
    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY {sort} {dir} LIMIT $1 OFFSET $2");
    let rows = sqlx::query(&sql)
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&state.pool)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(UserListResponse {
        users: rows.iter().map(record_from_row).collect(),
        pagination: page_info(total, page, limit),
    }))
}

/// `GET /api/user/search?q=` — name/email substring search.
pub async fn search_users(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<UserListResponse>, StatusCode> {
    let page = clamp_page(query.page);
    let limit = clamp_limit(query.limit);
    let pattern = format!("%{}%", query.q.trim());

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE name ILIKE $1 OR email ILIKE $1")
        .bind(&pattern)
        .fetch_one(&state.pool)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let sql = format!(
        "SELECT {USER_COLUMNS} FROM users WHERE name ILIKE $1 OR email ILIKE $1
         ORDER BY name ASC LIMIT $2 OFFSET $3"
    );
    let rows = sqlx::query(&sql)
        .bind(&pattern)
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&state.pool)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(UserListResponse {
        users: rows.iter().map(record_from_row).collect(),
        pagination: page_info(total, page, limit),
    }))
}

/// `GET /api/user/{id}` — full profile record.
pub async fn user_profile(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserRecord>, StatusCode> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    let row = sqlx::query(&sql)
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(record_from_row(&row)))
}

/// `PUT /api/user/{id}` — update own profile fields. Whole-field replacement;
/// omitted fields keep their current values.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<Json<UserRecord>, StatusCode> {
    if auth.user.id != user_id {
        return Err(StatusCode::FORBIDDEN);
    }
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(StatusCode::BAD_REQUEST);
        }
    }

    let sql = format!(
        r"UPDATE users SET
              name = COALESCE($2, name),
              age = COALESCE($3, age),
              gender = COALESCE($4, gender),
              profile_picture = COALESCE($5, profile_picture),
              updated_at = now()
          WHERE id = $1
          RETURNING {USER_COLUMNS}"
    );
    let row = sqlx::query(&sql)
        .bind(user_id)
        .bind(payload.name.as_deref().map(str::trim))
        .bind(payload.age)
        .bind(&payload.gender)
        .bind(&payload.profile_picture)
        .fetch_optional(&state.pool)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(record_from_row(&row)))
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
