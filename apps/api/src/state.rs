use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::emotion::tracker::EmotionStateTracker;
use crate::journal::store::LogStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    /// Last-known emotion per user (durable table + read-through cache).
    pub emotions: Arc<EmotionStateTracker>,
    /// Journal storage with its bounded recent-entries mirror.
    pub logs: Arc<LogStore>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config) -> Self {
        let emotions = Arc::new(EmotionStateTracker::new(db.clone()));
        let logs = Arc::new(LogStore::new(db.clone(), config.log_cache));
        Self {
            db,
            config,
            emotions,
            logs,
        }
    }
}
