//! Badge generation and the transition reward policy.
//!
//! Badges are modelled as a structured `BadgeAward` (base emotion badge plus an
//! optional `TransitionBadge`) and rendered to display text only at the API
//! boundary: `"<base>" + " + " + "<transition>"`.
//!
//! Transition rules (only when a previous emotion is known AND the coping task
//! was completed):
//! - negative → positive: bespoke recovery badge for the pair, generic
//!   de-escalation badge for any pair without bespoke text
//! - positive → positive: consistency badge
//! - anything else: no bonus

use serde::Serialize;

use crate::emotion::label::{EmotionLabel, Polarity};

/// Separator between the base badge and the transition badge in display text.
pub const BADGE_SEPARATOR: &str = " + ";

/// Substring identifying the generic de-escalation badge in stored badge text.
pub const DEESCALATION_MARKER: &str = "成功緩和";

const DEESCALATION_BADGE: &str = "🌟 成功緩和徽章 - 情緒管理的勝利";
const CONSISTENCY_BADGE: &str = "🏆 持之以恆徽章 - 保持積極心態的成就";

/// Base badge awarded for every classification.
pub fn base_badge(emotion: EmotionLabel) -> &'static str {
    match emotion {
        EmotionLabel::Anxious => "🛡️ 勇者徽章 - 戰勝焦慮",
        EmotionLabel::Sad => "🌈 彩虹徽章 - 擁抱療癒",
        EmotionLabel::Angry => "🔥 鳳凰徽章 - 轉化怒火",
        EmotionLabel::Happy => "⭐ 星光徽章 - 喜悅守護",
        EmotionLabel::Neutral => "⚖️ 平衡徽章 - 平靜之源",
    }
}

/// Bonus badge earned by an emotional transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionBadge {
    /// Negative → positive with bespoke text for the pair.
    Recovery {
        from: EmotionLabel,
        to: EmotionLabel,
    },
    /// Negative → positive without bespoke text.
    Deescalation,
    /// Positive → positive.
    Consistency,
}

impl TransitionBadge {
    pub fn text(&self) -> &'static str {
        match self {
            TransitionBadge::Recovery { from, to } => {
                recovery_text(*from, *to).unwrap_or(DEESCALATION_BADGE)
            }
            TransitionBadge::Deescalation => DEESCALATION_BADGE,
            TransitionBadge::Consistency => CONSISTENCY_BADGE,
        }
    }
}

fn recovery_text(from: EmotionLabel, to: EmotionLabel) -> Option<&'static str> {
    use EmotionLabel::*;
    match (from, to) {
        (Anxious, Happy) => Some("🌟 平復之星 - 從焦慮到喜悅的轉變"),
        (Anxious, Neutral) => Some("✨ 平靜之力 - 從焦慮到平靜的轉變"),
        (Sad, Happy) => Some("🌈 快樂重生 - 從傷心到喜悅的蛻變"),
        (Sad, Neutral) => Some("🌊 平靜如海 - 從傷心到平靜的治癒"),
        (Angry, Happy) => Some("🌞 和平使者 - 從憤怒到喜悅的轉化"),
        (Angry, Neutral) => Some("🌿 冷靜之心 - 從憤怒到平靜的掌控"),
        _ => None,
    }
}

/// Decides the transition bonus, if any.
pub fn transition_badge(
    previous: Option<EmotionLabel>,
    current: EmotionLabel,
    task_completed: bool,
) -> Option<TransitionBadge> {
    let previous = previous?;
    if !task_completed {
        return None;
    }

    match (previous.polarity(), current.polarity()) {
        (Polarity::Negative, Polarity::Positive) => Some(
            match recovery_text(previous, current) {
                Some(_) => TransitionBadge::Recovery {
                    from: previous,
                    to: current,
                },
                None => TransitionBadge::Deescalation,
            },
        ),
        (Polarity::Positive, Polarity::Positive) => Some(TransitionBadge::Consistency),
        _ => None,
    }
}

/// Everything awarded for one classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeAward {
    pub emotion: EmotionLabel,
    pub transition: Option<TransitionBadge>,
}

impl BadgeAward {
    pub fn new(
        previous: Option<EmotionLabel>,
        current: EmotionLabel,
        task_completed: bool,
    ) -> Self {
        Self {
            emotion: current,
            transition: transition_badge(previous, current, task_completed),
        }
    }

    pub fn base(&self) -> &'static str {
        base_badge(self.emotion)
    }

    /// The transition part as shown to clients: separator plus badge text,
    /// or empty when no bonus was earned.
    pub fn transition_fragment(&self) -> String {
        self.transition
            .map(|t| format!("{BADGE_SEPARATOR}{}", t.text()))
            .unwrap_or_default()
    }

    /// Full display string: base badge followed by the transition fragment.
    pub fn render(&self) -> String {
        format!("{}{}", self.base(), self.transition_fragment())
    }
}
