//! Per-user "last known emotion" state.
//!
//! The `user_emotions` table is authoritative. The in-memory map is a
//! read-through fallback keyed by email: it is warmed at startup, updated on
//! every write, and is the only record for callers without an account.
//!
//! Two concurrent classifications for the same user race on read-then-write;
//! whichever finishes last wins. The durable upsert and the cache insert are
//! separate steps, so that race can also leave the table and the cache holding
//! different labels for one registered user. Reads go to the table first, so
//! the stale cache entry is never served while the row exists. Requests for
//! different users never contend beyond the brief cache lock.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::emotion::label::EmotionLabel;
use crate::errors::AppError;

pub struct EmotionStateTracker {
    pool: SqlitePool,
    cache: RwLock<HashMap<String, EmotionLabel>>,
}

impl EmotionStateTracker {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Loads every durable record into the cache. Returns the number loaded.
    pub async fn warm_up(&self) -> Result<usize, AppError> {
        let rows: Vec<(String, EmotionLabel)> = sqlx::query_as(
            r#"
            SELECT u.email, ue.last_emotion
            FROM user_emotions ue
            JOIN users u ON u.user_id = ue.user_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let loaded = rows.len();
        self.cache.write().extend(rows);
        info!("Loaded {loaded} last-emotion records into cache");
        Ok(loaded)
    }

    /// Previous emotion for a user: durable record first, cache as fallback.
    pub async fn get_previous(&self, email: &str) -> Result<Option<EmotionLabel>, AppError> {
        let stored: Option<EmotionLabel> = sqlx::query_scalar(
            r#"
            SELECT ue.last_emotion
            FROM user_emotions ue
            JOIN users u ON u.user_id = ue.user_id
            WHERE u.email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        if stored.is_some() {
            return Ok(stored);
        }
        Ok(self.cache.read().get(email).copied())
    }

    /// Overwrites the user's last emotion. The durable row is only written for
    /// registered users; the cache is always updated. Returns whether a durable
    /// row was written.
    pub async fn set_current(
        &self,
        email: &str,
        emotion: EmotionLabel,
        at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_emotions (user_id, last_emotion, last_update)
            SELECT user_id, ?, ? FROM users WHERE email = ?
            ON CONFLICT(user_id) DO UPDATE SET
                last_emotion = excluded.last_emotion,
                last_update = excluded.last_update
            "#,
        )
        .bind(emotion)
        .bind(at)
        .bind(email)
        .execute(&self.pool)
        .await?;

        let persisted = result.rows_affected() > 0;
        self.cache.write().insert(email.to_string(), emotion);
        debug!("Last emotion for {email} set to {emotion} (durable: {persisted})");
        Ok(persisted)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }
}
