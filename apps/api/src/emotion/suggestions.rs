use serde::Serialize;

use crate::emotion::label::EmotionLabel;

/// Coping-suggestion package returned alongside a classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionPackage {
    pub tips: &'static str,
    pub daily_task: &'static str,
    pub advice: &'static str,
    pub resources: &'static str,
    /// Theme key for the client; always the label name.
    pub color: &'static str,
}

const ANXIOUS: SuggestionPackage = SuggestionPackage {
    tips: "深呼吸練習：吸氣4秒，憋氣4秒，吐氣4秒，重複5次。",
    daily_task: "去做一件放鬆的事，例如聽音樂或散步。",
    advice: "試著列出3件今天感恩的事，轉移焦點。",
    resources: "資源連結：https://www.headspace.com/meditation/anxiety (免費冥想App)",
    color: "anxious",
};

const SAD: SuggestionPackage = SuggestionPackage {
    tips: "聽一首喜歡的歌，或散步10分鐘接觸陽光。",
    daily_task: "寫下3件讓你微笑的小事。",
    advice: "寫日記：今天有什麼小事讓你微笑？",
    resources: "資源連結：https://www.helpguide.org/articles/depression/coping-with-grief-and-loss.htm",
    color: "sad",
};

const ANGRY: SuggestionPackage = SuggestionPackage {
    tips: "拳擊枕頭或快走5分鐘釋放能量。",
    daily_task: "做5分鐘運動來釋放怒氣。",
    advice: "問自己：這件事10年後還重要嗎？",
    resources: "資源連結：https://www.mayoclinic.org/healthy-lifestyle/adult-health/in-depth/anger-management/art-20045434",
    color: "angry",
};

const HAPPY: SuggestionPackage = SuggestionPackage {
    tips: "記錄這一刻，分享給朋友！",
    daily_task: "計劃一個小慶祝活動。",
    advice: "延續正面：計劃下一個小目標。",
    resources: "資源連結：https://positivepsychology.com/happiness-activities-exercises-tools/",
    color: "happy",
};

const NEUTRAL: SuggestionPackage = SuggestionPackage {
    tips: "維持平衡：喝杯水，伸展身體。",
    daily_task: "反思一天的正面時刻。",
    advice: "反思一天：什麼讓你感覺好？",
    resources: "資源連結：https://www.mind.org.uk/information-support/tips-for-everyday-living/wellbeing/",
    color: "neutral",
};

pub fn suggestion_for(emotion: EmotionLabel) -> &'static SuggestionPackage {
    match emotion {
        EmotionLabel::Anxious => &ANXIOUS,
        EmotionLabel::Sad => &SAD,
        EmotionLabel::Angry => &ANGRY,
        EmotionLabel::Happy => &HAPPY,
        EmotionLabel::Neutral => &NEUTRAL,
    }
}
