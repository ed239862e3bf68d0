//! Background upkeep: cache warm-up, periodic trimming of the log mirror,
//! and on-demand database backups.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::emotion::tracker::EmotionStateTracker;
use crate::errors::AppError;
use crate::journal::store::LogStore;
use crate::state::AppState;

/// Loads both caches from the database. Failures are logged and swallowed:
/// the service keeps running on a cold cache.
pub async fn warm_caches(emotions: &EmotionStateTracker, logs: &LogStore) {
    if let Err(e) = emotions.warm_up().await {
        error!("Failed to load last-emotion cache: {e}");
    }
    if let Err(e) = logs.warm_up().await {
        error!("Failed to load recent log cache: {e}");
    }
}

/// One cleanup pass. Returns the number of mirrored log entries dropped.
pub fn run_cleanup(emotions: &EmotionStateTracker, logs: &LogStore) -> usize {
    let dropped = logs.trim();
    info!(
        "Cache cleanup done: dropped {dropped} log entries, {} cached logs, {} cached emotions",
        logs.cached_len(),
        emotions.cached_len()
    );
    dropped
}

/// Runs `run_cleanup` immediately and then every `every`.
pub fn spawn_cleanup_task(
    emotions: Arc<EmotionStateTracker>,
    logs: Arc<LogStore>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            run_cleanup(&emotions, &logs);
        }
    })
}

#[derive(Debug, Serialize)]
pub struct BackupResponse {
    pub backup_file: String,
}

/// POST /api/backup-db
pub async fn handle_backup(State(state): State<AppState>) -> Result<Json<BackupResponse>, AppError> {
    let path = backup_database(&state.db, &state.config.backup_dir).await?;
    Ok(Json(BackupResponse {
        backup_file: path.display().to_string(),
    }))
}

/// Writes a consistent copy of the database into `dir` using `VACUUM INTO`.
pub async fn backup_database(pool: &SqlitePool, dir: &Path) -> Result<PathBuf, AppError> {
    let file_name = format!("moodmend_backup_{}.db", Utc::now().format("%Y%m%d_%H%M%S"));
    let path = dir.join(file_name);

    sqlx::query("VACUUM INTO ?")
        .bind(path.to_string_lossy().into_owned())
        .execute(pool)
        .await?;

    // An in-memory database accepts VACUUM INTO without writing anything.
    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Err(AppError::Database(sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("backup file {} was not written", path.display()),
        ))));
    }

    info!("Database backed up to {}", path.display());
    Ok(path)
}
