use axum::{extract::State, http::StatusCode, Json};
use sqlx::SqlitePool;
use tracing::info;

use crate::accounts::auth::{hash_password, is_valid_email, verify_password};
use crate::accounts::models::{AccountResponse, LoginRequest, RegisterRequest};
use crate::accounts::repository::{create_user, find_by_email, record_login, NewUser};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 6;
const USER_NAME_LEN: std::ops::RangeInclusive<usize> = 2..=20;

/// POST /api/register
pub async fn handle_register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let account = register_user(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// POST /api/login
pub async fn handle_login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    Ok(Json(login_user(&state.db, req).await?))
}

pub async fn register_user(
    pool: &SqlitePool,
    req: RegisterRequest,
) -> Result<AccountResponse, AppError> {
    let email = non_empty(req.email.as_deref());
    let password = non_empty(req.password.as_deref());
    let user_name = non_empty(req.user_name.as_deref());
    let (Some(email), Some(password), Some(user_name)) = (email, password, user_name) else {
        return Err(AppError::InvalidInput(
            "email, password and user_name are required".to_string(),
        ));
    };

    if !is_valid_email(email) {
        return Err(AppError::InvalidUser(format!("'{email}' is not a valid email")));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if !USER_NAME_LEN.contains(&user_name.chars().count()) {
        return Err(AppError::InvalidInput(format!(
            "user_name must be {}-{} characters",
            USER_NAME_LEN.start(),
            USER_NAME_LEN.end()
        )));
    }
    if let Some(confirm) = req.confirm_password.as_deref() {
        if confirm != password {
            return Err(AppError::InvalidInput("passwords do not match".to_string()));
        }
    }

    if find_by_email(pool, email).await?.is_some() {
        return Err(AppError::Conflict(format!("Email {email} is already registered")));
    }

    let password_hash = hash_password(password)?;
    let user = create_user(
        pool,
        NewUser {
            email,
            password_hash: &password_hash,
            user_name,
        },
    )
    .await?;

    info!("Registered user {email} ({user_name})");
    Ok(user.into())
}

pub async fn login_user(pool: &SqlitePool, req: LoginRequest) -> Result<AccountResponse, AppError> {
    let (Some(email), Some(password)) = (
        non_empty(req.email.as_deref()),
        non_empty(req.password.as_deref()),
    ) else {
        return Err(AppError::InvalidInput(
            "email and password are required".to_string(),
        ));
    };

    let user = find_by_email(pool, email)
        .await?
        .ok_or(AppError::AuthFailure)?;
    if !verify_password(password, &user.password_hash) {
        return Err(AppError::AuthFailure);
    }

    record_login(pool, &user.user_id).await?;
    info!("User {email} logged in");
    Ok(user.into())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
