//! Emotion classifier: weighted phrase scoring with a neutral fallback pass.
//!
//! Pure and deterministic. Every input, including the empty string, maps to
//! exactly one `EmotionLabel`.
//!
//! Algorithm:
//! 1. Lowercase the text.
//! 2. For each label, sum the weights of every distinct lexicon phrase that
//!    occurs as a substring (a phrase contributes once, however often it occurs).
//! 3. If any phrase matched, the highest score wins. Ties go to the label that
//!    comes first in `EmotionLabel::ALL` (anxious, sad, angry, happy, neutral).
//! 4. Otherwise run the fallback pass, which always lands on `neutral`; the
//!    branch taken is reported in `ClassificationResult::fallback`.

use serde::Serialize;

use crate::emotion::label::EmotionLabel;
use crate::emotion::lexicon::{
    keywords_for, vocabulary, LONG_TEXT_THRESHOLD, NEGATION_MARKERS, NEUTRAL_PHRASES,
};

/// Per-label score breakdown, in `EmotionLabel::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmotionScores([u32; 5]);

impl EmotionScores {
    pub fn get(&self, label: EmotionLabel) -> u32 {
        self.0[index_of(label)]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Highest-scoring label; the earliest label wins a tie.
    fn dominant(&self) -> EmotionLabel {
        let mut best = EmotionLabel::ALL[0];
        for label in EmotionLabel::ALL {
            if self.get(label) > self.get(best) {
                best = label;
            }
        }
        best
    }
}

/// Which fallback branch resolved unmatched text to neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    EmptyText,
    Negation,
    LongUnmatchedText,
    NeutralPhrase,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub emotion: EmotionLabel,
    pub scores: EmotionScores,
    pub fallback: Option<FallbackReason>,
}

/// Classifies free text into one of the five emotion labels.
pub fn classify(text: &str) -> EmotionLabel {
    classify_detailed(text).emotion
}

/// Same as [`classify`], keeping the score breakdown for diagnostics.
pub fn classify_detailed(text: &str) -> ClassificationResult {
    let normalized = text.to_lowercase();
    let scores = score(&normalized);

    if scores.total() > 0 {
        return ClassificationResult {
            emotion: scores.dominant(),
            scores,
            fallback: None,
        };
    }

    ClassificationResult {
        emotion: EmotionLabel::Neutral,
        scores,
        fallback: Some(fallback_reason(text, &normalized)),
    }
}

fn score(normalized: &str) -> EmotionScores {
    let mut scores = [0u32; 5];
    for label in EmotionLabel::ALL {
        scores[index_of(label)] = keywords_for(label)
            .iter()
            .filter(|k| normalized.contains(k.phrase))
            .map(|k| k.weight)
            .sum();
    }
    EmotionScores(scores)
}

fn fallback_reason(original: &str, normalized: &str) -> FallbackReason {
    if normalized.trim().is_empty() {
        return FallbackReason::EmptyText;
    }

    let has_negation = NEGATION_MARKERS.iter().any(|n| normalized.contains(n));
    let emotion_word_count = vocabulary().filter(|w| normalized.contains(w)).count();
    if has_negation
        || (original.chars().count() > LONG_TEXT_THRESHOLD && emotion_word_count == 0)
    {
        return if has_negation {
            FallbackReason::Negation
        } else {
            FallbackReason::LongUnmatchedText
        };
    }

    if NEUTRAL_PHRASES.iter().any(|p| normalized.contains(p)) {
        return FallbackReason::NeutralPhrase;
    }

    FallbackReason::Default
}

fn index_of(label: EmotionLabel) -> usize {
    match label {
        EmotionLabel::Anxious => 0,
        EmotionLabel::Sad => 1,
        EmotionLabel::Angry => 2,
        EmotionLabel::Happy => 3,
        EmotionLabel::Neutral => 4,
    }
}
