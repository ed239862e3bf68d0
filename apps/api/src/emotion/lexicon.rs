//! Static keyword lexicon: weighted phrases per emotion, plus the small
//! fallback vocabularies used when no weighted phrase matches.

use crate::emotion::label::EmotionLabel;

/// A lexicon phrase and its intensity weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordEntry {
    pub phrase: &'static str,
    pub weight: u32,
}

const fn kw(phrase: &'static str, weight: u32) -> KeywordEntry {
    KeywordEntry { phrase, weight }
}

const ANXIOUS: &[KeywordEntry] = &[
    kw("焦慮", 2),
    kw("擔心", 1),
    kw("壓力", 2),
    kw("緊張", 1),
    kw("不安", 1),
    kw("害怕", 2),
    kw("恐慌", 3),
    kw("慌張", 1),
    kw("緊繃", 1),
    kw("坐立不安", 2),
    kw("忐忑", 1),
    kw("煩憂", 1),
    kw("煩惱", 1),
    kw("憂慮", 1),
    kw("焦慮不安", 2),
];

const SAD: &[KeywordEntry] = &[
    kw("傷心", 2),
    kw("難過", 2),
    kw("沮喪", 2),
    kw("孤單", 1),
    kw("悲傷", 2),
    kw("失落", 1),
    kw("絕望", 3),
    kw("惆悵", 1),
    kw("憂鬱", 2),
    kw("傷感", 1),
    kw("空虛", 2),
    kw("鬱悶", 1),
    kw("難受", 1),
    kw("想哭", 1),
    kw("寂寞", 1),
];

const ANGRY: &[KeywordEntry] = &[
    kw("生氣", 2),
    kw("憤怒", 3),
    kw("煩躁", 1),
    kw("氣憤", 2),
    kw("不滿", 1),
    kw("惱火", 2),
    kw("惱怒", 2),
    kw("暴跳如雷", 3),
    kw("氣炸", 3),
    kw("憤慨", 2),
    kw("不悅", 1),
    kw("不爽", 1),
    kw("討厭", 1),
    kw("厭煩", 1),
    kw("惱恨", 2),
];

const HAPPY: &[KeywordEntry] = &[
    kw("快樂", 2),
    kw("開心", 2),
    kw("興奮", 2),
    kw("愉快", 1),
    kw("滿足", 1),
    kw("開朗", 1),
    kw("欣喜", 2),
    kw("高興", 2),
    kw("歡喜", 1),
    kw("雀躍", 2),
    kw("愉悅", 1),
    kw("欣慰", 1),
    kw("幸福", 2),
    kw("開懷", 1),
    kw("喜悅", 2),
];

const NEUTRAL: &[KeywordEntry] = &[
    kw("平靜", 1),
    kw("正常", 1),
    kw("沒事", 1),
    kw("ok", 1),
    kw("一般", 1),
    kw("平常", 1),
    kw("普通", 1),
    kw("淡定", 1),
    kw("無感", 1),
    kw("穩定", 1),
];

/// Negation markers. Any of these in otherwise unmatched text means "neutral".
pub const NEGATION_MARKERS: &[&str] = &["不", "沒有", "不是", "並非", "不覺得"];

/// Short phrases that read as "nothing much", checked last.
pub const NEUTRAL_PHRASES: &[&str] = &["沒什麼", "還好", "一般般", "普通", "正常", "可以"];

/// Unmatched text longer than this many characters is treated as neutral.
pub const LONG_TEXT_THRESHOLD: usize = 20;

/// Returns the weighted phrase list for an emotion.
pub fn keywords_for(emotion: EmotionLabel) -> &'static [KeywordEntry] {
    match emotion {
        EmotionLabel::Anxious => ANXIOUS,
        EmotionLabel::Sad => SAD,
        EmotionLabel::Angry => ANGRY,
        EmotionLabel::Happy => HAPPY,
        EmotionLabel::Neutral => NEUTRAL,
    }
}

/// Every lexicon phrase across all emotions, in label order.
pub fn vocabulary() -> impl Iterator<Item = &'static str> {
    EmotionLabel::ALL
        .into_iter()
        .flat_map(|label| keywords_for(label).iter().map(|k| k.phrase))
}
