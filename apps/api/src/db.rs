use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Opens (creating if missing) the SQLite database and returns a connection pool.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    info!("Opening SQLite database at {database_url}");

    let opts = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid SQLite URL '{database_url}'"))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(opts)
        .await?;

    info!("SQLite connection pool established");
    Ok(pool)
}

/// Creates the schema if it does not exist. Safe to run on every startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    debug!("Initializing SQLite schema...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id       TEXT PRIMARY KEY,
            email         TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            user_name     TEXT NOT NULL,
            created_at    TEXT NOT NULL,
            last_login    TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Append-only journal; rows are never updated or deleted.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS logs (
            log_id     TEXT PRIMARY KEY,
            user_id    TEXT NOT NULL REFERENCES users(user_id),
            email      TEXT NOT NULL,
            created_at TEXT NOT NULL,
            emotion    TEXT NOT NULL,
            task       TEXT NOT NULL,
            badge      TEXT NOT NULL,
            completed  BOOLEAN NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_logs_email_time ON logs (email, created_at)")
        .execute(pool)
        .await?;

    // One row per user, overwritten on every classification.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_emotions (
            user_id      TEXT PRIMARY KEY REFERENCES users(user_id),
            last_emotion TEXT NOT NULL,
            last_update  TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema ready");
    Ok(())
}

/// Single-connection in-memory database with the schema applied.
/// One connection only: every new in-memory connection is a fresh database.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(opts)
        .await
        .unwrap();
    init_schema(&pool).await.unwrap();
    pool
}

/// File-backed database under `dir` with the schema applied.
#[cfg(test)]
pub async fn file_pool(dir: &std::path::Path) -> SqlitePool {
    let pool = create_pool(&format!("sqlite://{}/live.db", dir.display()))
        .await
        .unwrap();
    init_schema(&pool).await.unwrap();
    pool
}
