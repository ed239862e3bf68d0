use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserRow {
    pub user_id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub user_name: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public account view returned by register and login.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub user_id: String,
    pub email: String,
    pub user_name: String,
}

impl From<UserRow> for AccountResponse {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.user_id,
            email: row.email,
            user_name: row.user_name,
        }
    }
}
