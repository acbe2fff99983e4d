//! Wire types shared with the AuthWeb API (camelCase JSON).

use serde::{Deserialize, Serialize};

/// Read-mostly projection of the authenticated user. Replaced wholesale on
/// every successful identity fetch; never partially merged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// Login/signup/OAuth-exchange response: user summary plus the bearer
/// credential the session store persists.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupData {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// Full directory record for profile pages.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_users: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserProfile>,
    pub pagination: PaginationInfo,
}
