use axum::{extract::State, Json};
use chrono::Utc;
use tracing::info;

use crate::accounts::auth::require_valid_email;
use crate::emotion::label::EmotionLabel;
use crate::errors::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::journal::models::{
    AppendLogRequest, AppendLogResponse, LogEntry, LogListQuery, LogListResponse,
    StatsQuery,
};
use crate::journal::stats::{compute_stats, StatsPeriod, StatsReport};
use crate::journal::store::{LogStore, NewLogEntry};
use crate::state::AppState;

/// POST /api/add-log
pub async fn handle_add_log(
    State(state): State<AppState>,
    AppJson(req): AppJson<AppendLogRequest>,
) -> Result<Json<AppendLogResponse>, AppError> {
    let log = append_log(&state.logs, req).await?;
    Ok(Json(AppendLogResponse { log }))
}

/// GET /api/get-logs
pub async fn handle_get_logs(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<LogListQuery>,
) -> Result<Json<LogListResponse>, AppError> {
    let email = require_valid_email(params.email.as_deref())?;
    let (limit, offset) = (params.limit(), params.offset());
    let Some(filter) = params.filter() else {
        info!("Log filter for {email} matches nothing: {params:?}");
        return Ok(Json(LogListResponse {
            logs: Vec::new(),
            total: 0,
            limit,
            offset,
        }));
    };
    let (logs, total) = state.logs.list(email, filter, limit, offset).await?;

    info!("Listed {} of {total} logs for {email}", logs.len());
    Ok(Json(LogListResponse {
        logs,
        total,
        limit,
        offset,
    }))
}

/// GET /api/get-stats
pub async fn handle_get_stats(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<StatsQuery>,
) -> Result<Json<StatsReport>, AppError> {
    let email = require_valid_email(params.email.as_deref())?;
    let period = StatsPeriod::from_query(params.period.as_deref());
    let report = stats_for(&state.logs, email, period).await?;
    Ok(Json(report))
}

pub async fn append_log(store: &LogStore, req: AppendLogRequest) -> Result<LogEntry, AppError> {
    let fields = (
        non_empty(req.email.as_deref()),
        non_empty(req.emotion.as_deref()),
        non_empty(req.task.as_deref()),
        non_empty(req.badge.as_deref()),
    );
    let (Some(email), Some(emotion), Some(task), Some(badge)) = fields else {
        return Err(AppError::InvalidInput(
            "email, emotion, task and badge are required".to_string(),
        ));
    };

    let email = require_valid_email(Some(email))?;
    let emotion: EmotionLabel = emotion
        .parse()
        .map_err(|e| AppError::InvalidInput(format!("{e}")))?;

    let entry = store
        .append(NewLogEntry {
            email,
            emotion,
            task,
            badge,
            completed: req.completed,
        })
        .await?;

    info!("Logged {} entry {} for {email}", entry.emotion, entry.log_id);
    Ok(entry)
}

pub async fn stats_for(
    store: &LogStore,
    email: &str,
    period: StatsPeriod,
) -> Result<StatsReport, AppError> {
    let now = Utc::now();
    let entries = store.summaries_since(email, period.window_start(now)).await?;
    let completed_dates = store.completed_dates(email).await?;
    let report = compute_stats(&entries, completed_dates, period, now.date_naive());

    info!(
        "Stats for {email}: completion {}%, transitions {}, streak {}",
        report.completion_rate, report.transitions, report.streak
    );
    Ok(report)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
