//! Wire models for the Nexus authentication endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User profile as returned by `GET /auth/me` and inside the login response.
///
/// The backend sends more than this (roles, timestamps); the shell keeps only
/// what the session core needs and ignores unknown fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_is_active() -> bool {
    true
}

/// Successful response body from `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub user: UserProfile,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Error body shape used by the backend (`{"detail": "..."}`).
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub detail: Option<String>,
}
