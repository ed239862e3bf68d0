//! Durable journal storage plus a bounded in-memory mirror of recent entries.
//!
//! SQLite is the source of truth for listing and statistics. The mirror only
//! exists for cheap introspection and is capped on every append and trimmed
//! by the maintenance task; dropping entries from it never touches the table.

use std::collections::VecDeque;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::accounts::repository::find_user_id;
use crate::config::LogCacheConfig;
use crate::emotion::label::EmotionLabel;
use crate::errors::AppError;
use crate::journal::models::{LogEntry, LogFilter, LogSummary};

/// Number of newest rows loaded into the mirror at startup.
const WARM_UP_ROWS: i64 = 100;

/// A validated entry ready to be appended.
pub struct NewLogEntry<'a> {
    pub email: &'a str,
    pub emotion: EmotionLabel,
    pub task: &'a str,
    pub badge: &'a str,
    pub completed: bool,
}

pub struct LogStore {
    pool: SqlitePool,
    limits: LogCacheConfig,
    recent: Mutex<VecDeque<LogEntry>>,
}

impl LogStore {
    pub fn new(pool: SqlitePool, limits: LogCacheConfig) -> Self {
        Self {
            pool,
            limits,
            recent: Mutex::new(VecDeque::new()),
        }
    }

    /// Appends an entry for an existing user (`NotFound` otherwise).
    pub async fn append(&self, new: NewLogEntry<'_>) -> Result<LogEntry, AppError> {
        let user_id = find_user_id(&self.pool, new.email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} does not exist", new.email)))?;

        let entry = LogEntry {
            log_id: Uuid::new_v4().to_string(),
            user_id,
            email: new.email.to_string(),
            created_at: Utc::now(),
            emotion: new.emotion,
            task: new.task.to_string(),
            badge: new.badge.to_string(),
            completed: new.completed,
        };

        sqlx::query(
            r#"
            INSERT INTO logs
                (log_id, user_id, email, created_at, emotion, task, badge, completed)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.log_id)
        .bind(&entry.user_id)
        .bind(&entry.email)
        .bind(entry.created_at)
        .bind(entry.emotion)
        .bind(&entry.task)
        .bind(&entry.badge)
        .bind(entry.completed)
        .execute(&self.pool)
        .await?;

        self.remember(entry.clone());
        Ok(entry)
    }

    /// Lists a user's entries, newest first, with the unpaged match count.
    pub async fn list(
        &self,
        email: &str,
        filter: LogFilter,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<LogEntry>, i64), AppError> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM logs WHERE ");
        push_filters(&mut query, email, filter);
        query
            .push(" ORDER BY created_at DESC, rowid DESC LIMIT ")
            .push_bind(i64::from(limit))
            .push(" OFFSET ")
            .push_bind(i64::from(offset));
        let logs = query
            .build_query_as::<LogEntry>()
            .fetch_all(&self.pool)
            .await?;

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM logs WHERE ");
        push_filters(&mut count, email, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        Ok((logs, total))
    }

    /// Entries at or after `since` (all entries when `None`), for statistics.
    pub async fn summaries_since(
        &self,
        email: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<LogSummary>, AppError> {
        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT created_at, emotion, badge, completed FROM logs WHERE email = ",
        );
        query.push_bind(email);
        if let Some(since) = since {
            query.push(" AND created_at >= ").push_bind(since);
        }
        Ok(query
            .build_query_as::<LogSummary>()
            .fetch_all(&self.pool)
            .await?)
    }

    /// Calendar dates (UTC) of every completed entry in the user's history.
    pub async fn completed_dates(&self, email: &str) -> Result<Vec<NaiveDate>, AppError> {
        let stamps: Vec<DateTime<Utc>> =
            sqlx::query_scalar("SELECT created_at FROM logs WHERE email = ? AND completed = 1")
                .bind(email)
                .fetch_all(&self.pool)
                .await?;
        Ok(stamps.into_iter().map(|t| t.date_naive()).collect())
    }

    /// Loads the newest durable entries into the mirror. Returns the number loaded.
    pub async fn warm_up(&self) -> Result<usize, AppError> {
        let mut rows = sqlx::query_as::<_, LogEntry>(
            "SELECT * FROM logs ORDER BY created_at DESC, rowid DESC LIMIT ?",
        )
        .bind(WARM_UP_ROWS)
        .fetch_all(&self.pool)
        .await?;
        rows.reverse();

        let loaded = rows.len();
        for entry in rows {
            self.remember(entry);
        }
        info!("Loaded {loaded} recent log entries into cache");
        Ok(loaded)
    }

    /// Drops the oldest mirrored entries once the mirror exceeds the trim
    /// threshold. Returns how many were dropped.
    pub fn trim(&self) -> usize {
        let mut recent = self.recent.lock();
        if recent.len() <= self.limits.trim_threshold {
            return 0;
        }
        let excess = recent.len().saturating_sub(self.limits.trim_to);
        recent.drain(..excess);
        excess
    }

    pub fn cached_len(&self) -> usize {
        self.recent.lock().len()
    }

    fn remember(&self, entry: LogEntry) {
        let mut recent = self.recent.lock();
        recent.push_back(entry);
        while recent.len() > self.limits.capacity {
            recent.pop_front();
        }
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Sqlite>, email: &str, filter: LogFilter) {
    query.push("email = ").push_bind(email.to_string());
    if let Some(emotion) = filter.emotion {
        query.push(" AND emotion = ").push_bind(emotion);
    }
    if let Some(date) = filter.date {
        let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
        let end = start + chrono::Duration::days(1);
        query
            .push(" AND created_at >= ")
            .push_bind(start)
            .push(" AND created_at < ")
            .push_bind(end);
    }
}
