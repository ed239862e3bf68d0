use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::emotion::label::EmotionLabel;

/// One journal entry. Append-only: never updated or deleted once stored.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct LogEntry {
    pub log_id: String,
    pub user_id: String,
    pub email: String,
    #[serde(rename = "time")]
    pub created_at: DateTime<Utc>,
    pub emotion: EmotionLabel,
    pub task: String,
    pub badge: String,
    pub completed: bool,
}

/// Projection of a log row used by the statistics aggregator.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct LogSummary {
    pub created_at: DateTime<Utc>,
    pub emotion: EmotionLabel,
    pub badge: String,
    pub completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct AppendLogRequest {
    pub email: Option<String>,
    pub emotion: Option<String>,
    pub task: Option<String>,
    pub badge: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Serialize)]
pub struct AppendLogResponse {
    pub log: LogEntry,
}

/// Raw `GET /api/get-logs` parameters. Everything but `email` is parsed
/// leniently: bad paging values fall back to the defaults, and a filter
/// value that no stored entry can carry matches nothing.
#[derive(Debug, Default, Deserialize)]
pub struct LogListQuery {
    pub email: Option<String>,
    pub emotion: Option<String>,
    pub date: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

pub const DEFAULT_LOG_LIMIT: u32 = 50;

impl LogListQuery {
    pub fn limit(&self) -> u32 {
        parse_or(self.limit.as_deref(), DEFAULT_LOG_LIMIT)
    }

    pub fn offset(&self) -> u32 {
        parse_or(self.offset.as_deref(), 0)
    }

    /// `None` when a given filter can never match (unknown emotion, malformed date).
    pub fn filter(&self) -> Option<LogFilter> {
        let emotion = match present(self.emotion.as_deref()) {
            Some(raw) => Some(raw.parse::<EmotionLabel>().ok()?),
            None => None,
        };
        let date = match present(self.date.as_deref()) {
            Some(raw) => Some(raw.parse::<NaiveDate>().ok()?),
            None => None,
        };
        Some(LogFilter { emotion, date })
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_or(value: Option<&str>, default: u32) -> u32 {
    present(value).and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Optional filters for listing a user's logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFilter {
    pub emotion: Option<EmotionLabel>,
    /// Restricts to one UTC calendar day.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct LogListResponse {
    pub logs: Vec<LogEntry>,
    pub total: i64,
    pub limit: u32,
    pub offset: u32,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub email: Option<String>,
    pub period: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(emotion: Option<&str>, date: Option<&str>) -> LogListQuery {
        LogListQuery {
            email: Some("amy@example.com".to_string()),
            emotion: emotion.map(str::to_string),
            date: date.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_paging_defaults_on_garbage() {
        let mut q = query(None, None);
        assert_eq!((q.limit(), q.offset()), (DEFAULT_LOG_LIMIT, 0));
        q.limit = Some("-1".to_string());
        q.offset = Some("abc".to_string());
        assert_eq!((q.limit(), q.offset()), (DEFAULT_LOG_LIMIT, 0));
        q.limit = Some("10".to_string());
        q.offset = Some("20".to_string());
        assert_eq!((q.limit(), q.offset()), (10, 20));
    }

    #[test]
    fn test_filter_parsing() {
        let f = query(Some("Sad"), Some("2026-10-19")).filter().unwrap();
        assert_eq!(f.emotion, Some(EmotionLabel::Sad));
        assert_eq!(f.date, NaiveDate::from_ymd_opt(2026, 10, 19));

        let f = query(Some(""), None).filter().unwrap();
        assert!(f.emotion.is_none() && f.date.is_none());
    }

    #[test]
    fn test_unmatchable_filters() {
        assert!(query(Some("calm"), None).filter().is_none());
        assert!(query(None, Some("yesterday")).filter().is_none());
    }
}
