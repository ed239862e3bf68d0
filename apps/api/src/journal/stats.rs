//! Statistics over a user's journal: completion rate, transition count,
//! emotion distribution and the consecutive-day completion streak.
//!
//! The transition counter only recognises the generic de-escalation badge
//! (`DEESCALATION_MARKER`). The bespoke recovery badges do not contain the
//! marker and are not counted; this matches the stored history.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::emotion::badges::DEESCALATION_MARKER;
use crate::emotion::label::EmotionLabel;
use crate::journal::models::LogSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    All,
    Week,
    Month,
}

impl StatsPeriod {
    /// Unknown or missing values fall back to `All`.
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(p) if p.eq_ignore_ascii_case("week") => StatsPeriod::Week,
            Some(p) if p.eq_ignore_ascii_case("month") => StatsPeriod::Month,
            _ => StatsPeriod::All,
        }
    }

    /// Inclusive lower bound of the window ending at `now`, or `None` for all time.
    pub fn window_start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            StatsPeriod::All => None,
            StatsPeriod::Week => Some(now - Duration::days(7)),
            StatsPeriod::Month => Some(now - Duration::days(30)),
        }
    }
}

/// Entry counts per emotion. All five labels are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmotionDistribution {
    pub anxious: u32,
    pub sad: u32,
    pub angry: u32,
    pub happy: u32,
    pub neutral: u32,
}

impl EmotionDistribution {
    fn record(&mut self, emotion: EmotionLabel) {
        let slot = match emotion {
            EmotionLabel::Anxious => &mut self.anxious,
            EmotionLabel::Sad => &mut self.sad,
            EmotionLabel::Angry => &mut self.angry,
            EmotionLabel::Happy => &mut self.happy,
            EmotionLabel::Neutral => &mut self.neutral,
        };
        *slot += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsReport {
    pub completion_rate: u32,
    pub transitions: u32,
    pub distribution: EmotionDistribution,
    pub total: u32,
    pub completed: u32,
    pub streak: u32,
    pub period: StatsPeriod,
}

/// Aggregates the entries of one period.
///
/// `entries` must already be restricted to the period window. The streak is
/// computed from `completed_dates`, which spans the user's whole history
/// regardless of period.
pub fn compute_stats(
    entries: &[LogSummary],
    completed_dates: impl IntoIterator<Item = NaiveDate>,
    period: StatsPeriod,
    today: NaiveDate,
) -> StatsReport {
    let mut distribution = EmotionDistribution::default();
    let mut completed = 0u32;
    let mut transitions = 0u32;

    for entry in entries {
        distribution.record(entry.emotion);
        if entry.completed {
            completed += 1;
        }
        if entry.badge.contains(DEESCALATION_MARKER) {
            transitions += 1;
        }
    }

    let total = entries.len() as u32;
    StatsReport {
        completion_rate: completion_rate(completed, total),
        transitions,
        distribution,
        total,
        completed,
        streak: streak(completed_dates, today),
        period,
    }
}

/// Percentage of completed entries, rounded half-to-even. Zero when there are no entries.
pub fn completion_rate(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (completed as f64 / total as f64 * 100.0).round_ties_even() as u32
}

/// Consecutive calendar days ending today that have at least one completed entry.
/// A day without a completed entry today means a streak of zero.
pub fn streak(completed_dates: impl IntoIterator<Item = NaiveDate>, today: NaiveDate) -> u32 {
    let distinct: BTreeSet<NaiveDate> = completed_dates.into_iter().collect();

    let mut streak = 0u32;
    for date in distinct.into_iter().rev() {
        if (today - date).num_days() == i64::from(streak) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}
