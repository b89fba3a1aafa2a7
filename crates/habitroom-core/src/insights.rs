//! Motivational messages and simple pattern suggestions.
//!
//! Message text is cosmetic; tier selection by streak length is the part
//! with rules. The RNG is seedable so output is reproducible in tests and
//! when a seed is pinned in configuration.

use chrono::Datelike;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::Serialize;

use crate::habit::{Habit, LogEntry};

/// Streak bracket a motivational message is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MotivationTier {
    /// No streak yet.
    Start,
    /// Streak of 1-2.
    WarmingUp,
    /// Streak of 3-6.
    OnFire,
    /// Streak of 7 or more.
    Legendary,
}

impl MotivationTier {
    /// Bracket for a given streak length.
    pub fn for_streak(streak: u32) -> MotivationTier {
        match streak {
            0 => MotivationTier::Start,
            1..=2 => MotivationTier::WarmingUp,
            3..=6 => MotivationTier::OnFire,
            _ => MotivationTier::Legendary,
        }
    }

    /// Message pool for this bracket.
    pub fn messages(&self) -> &'static [&'static str] {
        match self {
            MotivationTier::Start => &[
                "Every journey begins with a single step. Start today!",
                "Don't worry about yesterday. Today is a new opportunity.",
                "Small progress is still progress.",
            ],
            MotivationTier::WarmingUp => &[
                "You're off to a great start! Keep it up!",
                "Consistency is key. You're building momentum.",
                "Great job! Two days in a row!",
            ],
            MotivationTier::OnFire => &[
                "You're on fire! 🔥",
                "Almost a full week! Don't break the chain!",
                "You are becoming unstoppable.",
            ],
            MotivationTier::Legendary => &[
                "Legendary streak! 🏆",
                "This habit is now part of you.",
                "Incredible dedication. Use this energy for other goals too!",
            ],
        }
    }
}

/// Seedable RNG for message selection. `None` seeds from entropy.
pub fn message_rng(seed: Option<u64>) -> Pcg64 {
    match seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_entropy(),
    }
}

/// Pick a message for the streak's tier.
pub fn motivational_message(streak: u32, rng: &mut Pcg64) -> &'static str {
    let pool = MotivationTier::for_streak(streak).messages();
    pool.choose(rng).copied().unwrap_or(pool[0])
}

/// Heuristic suggestions from logged history.
///
/// Surfaces the weekday with the most completions and any habits that have
/// never been logged. Returns a fallback prompt when there is no history
/// yet, so callers always have something to show.
pub fn suggestions(habits: &[Habit], log: &[LogEntry]) -> Vec<String> {
    if habits.is_empty() || log.is_empty() {
        return vec!["Start logging your habits to get smart insights!".to_string()];
    }

    let mut out = Vec::new();

    // Weekday with the most completions. Ties resolve to the earlier
    // weekday (Monday first) so output is stable.
    let mut by_weekday = [0u64; 7];
    for entry in log {
        by_weekday[entry.date.weekday().num_days_from_monday() as usize] += 1;
    }
    if let Some((best, count)) = by_weekday
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(&a.0)))
    {
        if *count > 0 {
            const WEEKDAYS: [&str; 7] = [
                "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
            ];
            out.push(format!(
                "💡 You happen to be most consistent on {}s. Try to schedule your hardest tasks then!",
                WEEKDAYS[best]
            ));
        }
    }

    for habit in habits.iter().filter(|h| h.active) {
        if !log.iter().any(|e| e.habit_id == habit.id) {
            out.push(format!(
                "👀 You haven't started {} yet. How about doing just 5 minutes today?",
                habit.name
            ));
        }
    }

    if out.is_empty() {
        out.push("🌟 You are doing great! Keep tracking to unlock more insights.".to_string());
    }
    out
}
