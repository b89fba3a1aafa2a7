//! Gamification layer: XP, levels, and badges.
//!
//! The static level ladder and badge catalog live here; the reward
//! transition itself is in [`rewards`]. All reward computation is a pure
//! function of pre-event state and the completion event — persistence of the
//! updated totals belongs to the storage layer.

mod rewards;

pub use rewards::{process_completion, xp_for_completion, CompletionEvent, CompletionReward, UserProgress};

use serde::Serialize;

/// Base XP granted for every completion.
pub const XP_PER_COMPLETION: u32 = 10;
/// Bonus for crossing into a 7-day streak.
pub const XP_STREAK_BONUS_7: u32 = 50;
/// Bonus for crossing into a 30-day streak.
pub const XP_STREAK_BONUS_30: u32 = 200;

/// A named tier in the level ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Level {
    pub level: u32,
    pub name: &'static str,
    pub xp_required: u64,
}

/// Level ladder, ascending by XP threshold starting at 0.
pub static LEVELS: [Level; 7] = [
    Level { level: 1, name: "🌱 Beginner", xp_required: 0 },
    Level { level: 2, name: "🧱 Builder", xp_required: 100 },
    Level { level: 3, name: "🏃 Striver", xp_required: 300 },
    Level { level: 4, name: "🛡️ Guardian", xp_required: 600 },
    Level { level: 5, name: "⚔️ Warrior", xp_required: 1000 },
    Level { level: 6, name: "🧘 Master", xp_required: 1500 },
    Level { level: 7, name: "👑 Legend", xp_required: 2500 },
];

/// A one-time achievement flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

/// Badge catalog.
pub static BADGES: [Badge; 4] = [
    Badge {
        id: "first_step",
        name: "First Step",
        icon: "👟",
        description: "Complete your first habit",
    },
    Badge {
        id: "hat_trick",
        name: "Hat Trick",
        icon: "🎩",
        description: "Complete 3 habits in one day",
    },
    Badge {
        id: "week_warrior",
        name: "Week Warrior",
        icon: "🔥",
        description: "Achieve a 7-day streak",
    },
    Badge {
        id: "month_master",
        name: "Monthly Master",
        icon: "🏆",
        description: "Achieve a 30-day streak",
    },
];

/// Look up a badge by identifier.
pub fn badge(id: &str) -> Option<&'static Badge> {
    BADGES.iter().find(|b| b.id == id)
}

/// The highest level whose XP threshold is at or below `total_xp`.
pub fn level_for(total_xp: u64) -> &'static Level {
    let mut current = &LEVELS[0];
    for level in &LEVELS {
        if total_xp >= level.xp_required {
            current = level;
        } else {
            break;
        }
    }
    current
}

/// The next level above the current one, if any.
pub fn next_level(total_xp: u64) -> Option<&'static Level> {
    let current = level_for(total_xp);
    LEVELS.iter().find(|l| l.xp_required > current.xp_required)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_thresholds_ascend() {
        for pair in LEVELS.windows(2) {
            assert!(pair[0].xp_required < pair[1].xp_required);
            assert!(pair[0].level < pair[1].level);
        }
        assert_eq!(LEVELS[0].xp_required, 0);
    }

    #[test]
    fn level_for_picks_highest_reached() {
        assert_eq!(level_for(0).level, 1);
        assert_eq!(level_for(99).level, 1);
        assert_eq!(level_for(100).level, 2);
        assert_eq!(level_for(2499).level, 6);
        assert_eq!(level_for(2500).level, 7);
        assert_eq!(level_for(1_000_000).level, 7);
    }

    #[test]
    fn next_level_at_cap_is_none() {
        assert_eq!(next_level(0).map(|l| l.level), Some(2));
        assert_eq!(next_level(1500).map(|l| l.level), Some(7));
        assert!(next_level(2500).is_none());
    }

    #[test]
    fn badge_lookup() {
        assert_eq!(badge("week_warrior").map(|b| b.name), Some("Week Warrior"));
        assert!(badge("unknown").is_none());
    }
}
