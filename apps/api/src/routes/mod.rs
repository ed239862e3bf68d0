pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::accounts::handlers as accounts;
use crate::emotion::handlers as emotion;
use crate::journal::handlers as journal;
use crate::maintenance;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/health", get(health::health_handler))
        // Accounts
        .route("/api/register", post(accounts::handle_register))
        .route("/api/login", post(accounts::handle_login))
        // Emotion processing
        .route("/api/process-emotion", post(emotion::handle_process_emotion))
        // Journal
        .route("/api/add-log", post(journal::handle_add_log))
        .route("/api/get-logs", get(journal::handle_get_logs))
        .route("/api/get-stats", get(journal::handle_get_stats))
        // Maintenance
        .route("/api/backup-db", post(maintenance::handle_backup))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::{Config, LogCacheConfig};
    use crate::db::{file_pool, test_pool};
    use sqlx::SqlitePool;

    async fn test_app(backup_dir: std::path::PathBuf) -> Router {
        app_with_pool(test_pool().await, backup_dir)
    }

    fn app_with_pool(pool: SqlitePool, backup_dir: std::path::PathBuf) -> Router {
        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            port: 0,
            backup_dir,
            log_cache: LogCacheConfig::default(),
            cleanup_interval_secs: 3600,
            rust_log: "info".to_string(),
        };
        build_router(AppState::new(pool, config))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let resp = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn register_amy(app: &Router) {
        let (status, _) = send(
            app,
            Method::POST,
            "/api/register",
            Some(json!({
                "email": "amy@example.com",
                "password": "secret1",
                "confirm_password": "secret1",
                "user_name": "Amy",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_health_reports_healthy() {
        let app = test_app(".".into()).await;
        for uri in ["/health", "/api/health"] {
            let (status, body) = send(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "healthy");
            assert_eq!(body["cached_logs"], 0);
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let app = test_app(".".into()).await;
        register_amy(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/login",
            Some(json!({"email": "amy@example.com", "password": "secret1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_name"], "Amy");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/login",
            Some(json!({"email": "amy@example.com", "password": "wrong!"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"]["code"].is_string());
    }

    #[tokio::test]
    async fn test_process_log_and_stats_flow() {
        let app = test_app(".".into()).await;
        register_amy(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/process-emotion",
            Some(json!({"email": "amy@example.com", "input": "我覺得好焦慮"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["emotion"], "anxious");
        assert_eq!(body["transition_badge"], "");
        assert!(body["package"]["daily_task"].is_string());

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/process-emotion",
            Some(json!({
                "email": "amy@example.com",
                "input": {"text": "今天很開心"},
                "task_completed": true,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["emotion"], "happy");
        let badge = body["badge"].as_str().unwrap().to_string();
        assert!(!body["transition_badge"].as_str().unwrap().is_empty());

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/add-log",
            Some(json!({
                "email": "amy@example.com",
                "emotion": "happy",
                "task": "寫下三件感恩的事",
                "badge": badge,
                "completed": true,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/get-logs?email=amy@example.com&emotion=happy",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["logs"][0]["emotion"], "happy");

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/get-stats?email=amy@example.com&period=week",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["completion_rate"], 100);
        assert_eq!(body["streak"], 1);
        assert_eq!(body["period"], "week");
    }

    #[tokio::test]
    async fn test_validation_errors_map_to_status() {
        let app = test_app(".".into()).await;

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/process-emotion",
            Some(json!({"email": "amy@example.com", "input": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/process-emotion",
            Some(json!({"email": "nope", "input": "好開心"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/add-log",
            Some(json!({
                "email": "ghost@example.com",
                "emotion": "sad",
                "task": "walk",
                "badge": "b",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_backup_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with_pool(file_pool(dir.path()).await, dir.path().to_path_buf());
        let (status, body) = send(&app, Method::POST, "/api/backup-db", None).await;
        assert_eq!(status, StatusCode::OK);
        let file = body["backup_file"].as_str().unwrap();
        assert!(std::path::Path::new(file).exists());
    }

    #[tokio::test]
    async fn test_backup_endpoint_reports_unwritten_file() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path().to_path_buf()).await;
        let (status, body) = send(&app, Method::POST, "/api/backup-db", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "STORAGE_FAILURE");
    }

    #[tokio::test]
    async fn test_malformed_bodies_get_structured_errors() {
        let app = test_app(".".into()).await;
        register_amy(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/process-emotion",
            Some(json!({"email": "amy@example.com", "input": "好開心", "task_completed": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");

        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/add-log")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_lenient_log_query_values() {
        let app = test_app(".".into()).await;
        register_amy(&app).await;
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/add-log",
            Some(json!({
                "email": "amy@example.com",
                "emotion": "sad",
                "task": "walk",
                "badge": "b",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/get-logs?email=amy@example.com&emotion=calm",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
        assert_eq!(body["logs"].as_array().unwrap().len(), 0);

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/get-logs?email=amy@example.com&limit=-1&offset=x",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["limit"], 50);
        assert_eq!(body["offset"], 0);
        assert_eq!(body["total"], 1);

        let (status, body) = send(&app, Method::GET, "/api/get-logs?email=nope", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_USER");
    }
}
