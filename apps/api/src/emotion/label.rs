use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of emotions the classifier can produce.
///
/// Declaration order is significant: it is the iteration order used by the
/// classifier's tie-break (first label wins on equal scores).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum EmotionLabel {
    Anxious,
    Sad,
    Angry,
    Happy,
    Neutral,
}

/// Polarity used by the transition reward rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Negative,
    Positive,
}

impl EmotionLabel {
    pub const ALL: [EmotionLabel; 5] = [
        EmotionLabel::Anxious,
        EmotionLabel::Sad,
        EmotionLabel::Angry,
        EmotionLabel::Happy,
        EmotionLabel::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Anxious => "anxious",
            EmotionLabel::Sad => "sad",
            EmotionLabel::Angry => "angry",
            EmotionLabel::Happy => "happy",
            EmotionLabel::Neutral => "neutral",
        }
    }

    /// Neutral counts as positive: staying calm is rewarded like staying happy.
    pub fn polarity(&self) -> Polarity {
        match self {
            EmotionLabel::Anxious | EmotionLabel::Sad | EmotionLabel::Angry => Polarity::Negative,
            EmotionLabel::Happy | EmotionLabel::Neutral => Polarity::Positive,
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown emotion '{0}'")]
pub struct UnknownEmotion(pub String);

impl FromStr for EmotionLabel {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmotionLabel::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownEmotion(s.to_string()))
    }
}
