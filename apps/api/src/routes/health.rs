use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::error;

use crate::state::AppState;

/// GET /health
/// Probes the database and reports cache sizes; 503 when storage is unreachable.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "timestamp": Utc::now().to_rfc3339(),
                "version": env!("CARGO_PKG_VERSION"),
                "service": "moodmend-api",
                "cached_emotions": state.emotions.cached_len(),
                "cached_logs": state.logs.cached_len(),
            })),
        ),
        Err(e) => {
            error!("Health check failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "error": e.to_string(),
                })),
            )
        }
    }
}
