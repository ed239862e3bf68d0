use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::accounts::auth::require_valid_email;
use crate::emotion::badges::BadgeAward;
use crate::emotion::classifier::classify_detailed;
use crate::emotion::input::normalize_input;
use crate::emotion::label::EmotionLabel;
use crate::emotion::suggestions::{suggestion_for, SuggestionPackage};
use crate::emotion::tracker::EmotionStateTracker;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProcessEmotionRequest {
    pub email: Option<String>,
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub task_completed: bool,
}

#[derive(Debug, Serialize)]
pub struct ProcessEmotionResponse {
    pub emotion: EmotionLabel,
    pub package: &'static SuggestionPackage,
    /// Display text: base badge, plus the transition fragment when earned.
    pub badge: String,
    /// `" + <transition badge>"`, or empty when no bonus was earned.
    pub transition_badge: String,
}

/// POST /api/process-emotion
pub async fn handle_process_emotion(
    State(state): State<AppState>,
    AppJson(req): AppJson<ProcessEmotionRequest>,
) -> Result<Json<ProcessEmotionResponse>, AppError> {
    Ok(Json(process_emotion(&state.emotions, req).await?))
}

/// Classifies the input, awards badges against the user's previous emotion,
/// and records the new emotion as the user's latest.
pub async fn process_emotion(
    tracker: &EmotionStateTracker,
    req: ProcessEmotionRequest,
) -> Result<ProcessEmotionResponse, AppError> {
    let text = normalize_input(req.input);
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::InvalidInput(
            "Please describe how you feel".to_string(),
        ));
    }
    let email = require_valid_email(req.email.as_deref())?;

    let classification = classify_detailed(text);
    let emotion = classification.emotion;
    debug!(
        "Scores for {email}: {:?} (fallback: {:?})",
        classification.scores, classification.fallback
    );

    let previous = tracker.get_previous(email).await?;
    let award = BadgeAward::new(previous, emotion, req.task_completed);
    tracker.set_current(email, emotion, Utc::now()).await?;

    let preview: String = text.chars().take(30).collect();
    info!(
        "Processed emotion for {email}: input='{preview}', emotion={emotion}, previous={previous:?}, transition={:?}",
        award.transition
    );

    Ok(ProcessEmotionResponse {
        emotion,
        package: suggestion_for(emotion),
        badge: award.render(),
        transition_badge: award.transition_fragment(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::repository::{create_user, NewUser};
    use crate::db::test_pool;
    use crate::emotion::badges::base_badge;
    use serde_json::json;

    async fn tracker_with_user() -> EmotionStateTracker {
        let pool = test_pool().await;
        create_user(
            &pool,
            NewUser {
                email: "amy@example.com",
                password_hash: "hash",
                user_name: "Amy",
            },
        )
        .await
        .unwrap();
        EmotionStateTracker::new(pool)
    }

    fn request(input: Value, task_completed: bool) -> ProcessEmotionRequest {
        ProcessEmotionRequest {
            email: Some("amy@example.com".to_string()),
            input,
            task_completed,
        }
    }

    #[tokio::test]
    async fn test_first_classification_has_no_transition() {
        let tracker = tracker_with_user().await;
        let resp = process_emotion(&tracker, request(json!("今天好難過"), true))
            .await
            .unwrap();
        assert_eq!(resp.emotion, EmotionLabel::Sad);
        assert_eq!(resp.package.color, "sad");
        assert_eq!(resp.badge, base_badge(EmotionLabel::Sad));
        assert_eq!(resp.transition_badge, "");
    }

    #[tokio::test]
    async fn test_recovery_transition_after_completed_task() {
        let tracker = tracker_with_user().await;
        process_emotion(&tracker, request(json!("今天好難過"), false))
            .await
            .unwrap();
        let resp = process_emotion(&tracker, request(json!("現在很開心"), true))
            .await
            .unwrap();
        assert_eq!(resp.emotion, EmotionLabel::Happy);
        assert_eq!(
            resp.transition_badge,
            " + 🌈 快樂重生 - 從傷心到喜悅的蛻變"
        );
        assert_eq!(
            resp.badge,
            format!("{}{}", base_badge(EmotionLabel::Happy), resp.transition_badge)
        );
    }

    #[tokio::test]
    async fn test_no_transition_when_task_not_completed() {
        let tracker = tracker_with_user().await;
        process_emotion(&tracker, request(json!("很焦慮"), true))
            .await
            .unwrap();
        let resp = process_emotion(&tracker, request(json!("好開心"), false))
            .await
            .unwrap();
        assert_eq!(resp.transition_badge, "");
        // State still advances even without a bonus.
        assert_eq!(
            tracker.get_previous("amy@example.com").await.unwrap(),
            Some(EmotionLabel::Happy)
        );
    }

    #[tokio::test]
    async fn test_object_input_is_normalized() {
        let tracker = tracker_with_user().await;
        let resp = process_emotion(&tracker, request(json!({"text": "氣炸了"}), false))
            .await
            .unwrap();
        assert_eq!(resp.emotion, EmotionLabel::Angry);
    }

    #[tokio::test]
    async fn test_object_input_uses_first_sent_field() {
        let tracker = tracker_with_user().await;
        let input: Value = serde_json::from_str(r#"{"z": "好開心", "a": "好難過"}"#).unwrap();
        let resp = process_emotion(&tracker, request(input, false))
            .await
            .unwrap();
        assert_eq!(resp.emotion, EmotionLabel::Happy);
    }

    #[tokio::test]
    async fn test_empty_input_rejected() {
        let tracker = tracker_with_user().await;
        for input in [json!(null), json!("   "), json!({})] {
            let err = process_emotion(&tracker, request(input, false))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn test_bad_email_rejected() {
        let tracker = tracker_with_user().await;
        let mut req = request(json!("好開心"), false);
        req.email = Some("not-an-email".to_string());
        let err = process_emotion(&tracker, req).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidUser(_)));
    }
}
