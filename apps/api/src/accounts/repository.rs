use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::accounts::models::UserRow;
use crate::errors::AppError;

/// Parameters for inserting a new account.
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub user_name: &'a str,
}

/// Inserts a user. A duplicate email surfaces as `Conflict`.
pub async fn create_user(pool: &SqlitePool, user: NewUser<'_>) -> Result<UserRow, AppError> {
    let row = UserRow {
        user_id: Uuid::new_v4().to_string(),
        email: user.email.to_string(),
        password_hash: user.password_hash.to_string(),
        user_name: user.user_name.to_string(),
        created_at: Utc::now(),
        last_login: None,
    };

    let inserted = sqlx::query(
        r#"
        INSERT INTO users (user_id, email, password_hash, user_name, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&row.user_id)
    .bind(&row.email)
    .bind(&row.password_hash)
    .bind(&row.user_name)
    .bind(row.created_at)
    .execute(pool)
    .await;

    match inserted {
        Ok(_) => {
            info!("Created user {} ({})", row.email, row.user_id);
            Ok(row)
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
            format!("Email {} is already registered", user.email),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<UserRow>, AppError> {
    Ok(
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn find_user_id(pool: &SqlitePool, email: &str) -> Result<Option<String>, AppError> {
    Ok(
        sqlx::query_scalar("SELECT user_id FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn record_login(pool: &SqlitePool, user_id: &str) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET last_login = ? WHERE user_id = ?")
        .bind(Utc::now())
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}
