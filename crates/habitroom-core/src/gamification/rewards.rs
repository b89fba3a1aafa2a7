//! Reward transition for a completion event.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    badge, level_for, Badge, Level, XP_PER_COMPLETION, XP_STREAK_BONUS_30, XP_STREAK_BONUS_7,
};

/// Accumulated user progress.
///
/// `total_xp` is monotonically non-decreasing and `unlocked_badges` is
/// append-only; both are mutated only through [`process_completion`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    pub total_xp: u64,
    #[serde(default)]
    pub unlocked_badges: Vec<String>,
}

impl UserProgress {
    pub fn has_badge(&self, id: &str) -> bool {
        self.unlocked_badges.iter().any(|b| b == id)
    }
}

/// The facts about one completion that the reward engine consumes.
#[derive(Debug, Clone, Copy)]
pub struct CompletionEvent {
    /// Streak of the habit before this completion was logged.
    pub streak_before: u32,
    /// Streak of the habit after this completion was logged.
    pub streak_after: u32,
    /// Completions across all habits dated the same day, including this one.
    pub completions_today: u64,
}

/// What a completion earned.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionReward {
    pub xp_earned: u32,
    pub level_up: bool,
    pub current_level: &'static Level,
    pub new_badges: Vec<&'static Badge>,
    /// Progress with the XP and badges applied; the caller persists this.
    pub progress_after: UserProgress,
}

/// XP earned for a completion, given the streak transition.
///
/// Milestone bonuses are edge-triggered: crossing into 7 or 30 awards once;
/// sitting at the threshold without crossing awards only the base XP. Total
/// over all non-negative inputs.
pub fn xp_for_completion(streak_before: u32, streak_after: u32) -> u32 {
    let mut xp = XP_PER_COMPLETION;
    if streak_after == 7 && streak_before < 7 {
        xp += XP_STREAK_BONUS_7;
    }
    if streak_after == 30 && streak_before < 30 {
        xp += XP_STREAK_BONUS_30;
    }
    xp
}

/// Pure reward transition: (pre-event progress, completion event) → reward.
///
/// Badge unlocks are idempotent — a badge already in the unlocked set is
/// never re-added, so replaying the check cannot double-award. The returned
/// `progress_after` carries the new XP total and badge set; persisting it is
/// the caller's responsibility.
pub fn process_completion(pre: &UserProgress, event: &CompletionEvent) -> CompletionReward {
    let xp_earned = xp_for_completion(event.streak_before, event.streak_after);

    let mut candidates: Vec<&'static str> = Vec::new();
    if pre.total_xp == 0 {
        candidates.push("first_step");
    }
    if event.completions_today == 3 {
        candidates.push("hat_trick");
    }
    if event.streak_after == 7 {
        candidates.push("week_warrior");
    }
    if event.streak_after == 30 {
        candidates.push("month_master");
    }

    let new_badges: Vec<&'static Badge> = candidates
        .into_iter()
        .filter(|id| !pre.has_badge(id))
        .filter_map(badge)
        .collect();

    let mut progress_after = pre.clone();
    progress_after.total_xp += u64::from(xp_earned);
    progress_after
        .unlocked_badges
        .extend(new_badges.iter().map(|b| b.id.to_string()));

    let current_level = level_for(progress_after.total_xp);
    let previous_level = level_for(progress_after.total_xp - u64::from(xp_earned));
    let level_up = current_level.level > previous_level.level;

    debug!(
        xp_earned,
        level = current_level.level,
        level_up,
        badges = new_badges.len(),
        "completion reward computed"
    );

    CompletionReward {
        xp_earned,
        level_up,
        current_level,
        new_badges,
        progress_after,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(streak_before: u32, streak_after: u32) -> CompletionEvent {
        CompletionEvent {
            streak_before,
            streak_after,
            completions_today: 1,
        }
    }

    #[test]
    fn xp_edge_triggers() {
        assert_eq!(xp_for_completion(6, 7), 60);
        assert_eq!(xp_for_completion(7, 7), 10);
        assert_eq!(xp_for_completion(29, 30), 210);
        assert_eq!(xp_for_completion(0, 1), 10);
        assert_eq!(xp_for_completion(30, 30), 10);
        assert_eq!(xp_for_completion(0, 30), 210);
    }

    #[test]
    fn first_step_on_zero_xp() {
        let pre = UserProgress::default();
        let reward = process_completion(&pre, &event(0, 1));
        assert!(reward.new_badges.iter().any(|b| b.id == "first_step"));
        assert_eq!(reward.progress_after.total_xp, 10);
    }

    #[test]
    fn first_step_not_awarded_twice() {
        let pre = UserProgress {
            total_xp: 0,
            unlocked_badges: vec!["first_step".to_string()],
        };
        let reward = process_completion(&pre, &event(0, 1));
        assert!(reward.new_badges.is_empty());
        assert_eq!(reward.progress_after.unlocked_badges, vec!["first_step"]);
    }

    #[test]
    fn hat_trick_on_exactly_third_completion() {
        let pre = UserProgress {
            total_xp: 50,
            unlocked_badges: vec![],
        };
        let third = CompletionEvent {
            streak_before: 1,
            streak_after: 2,
            completions_today: 3,
        };
        let reward = process_completion(&pre, &third);
        assert!(reward.new_badges.iter().any(|b| b.id == "hat_trick"));

        let fourth = CompletionEvent {
            completions_today: 4,
            ..third
        };
        let reward = process_completion(&pre, &fourth);
        assert!(!reward.new_badges.iter().any(|b| b.id == "hat_trick"));
    }

    #[test]
    fn streak_badges_at_exact_milestones() {
        let pre = UserProgress {
            total_xp: 100,
            unlocked_badges: vec![],
        };
        let reward = process_completion(&pre, &event(6, 7));
        assert!(reward.new_badges.iter().any(|b| b.id == "week_warrior"));

        let reward = process_completion(&pre, &event(29, 30));
        assert!(reward.new_badges.iter().any(|b| b.id == "month_master"));

        let reward = process_completion(&pre, &event(7, 8));
        assert!(reward.new_badges.is_empty());
    }

    #[test]
    fn badge_unlock_is_idempotent() {
        let pre = UserProgress {
            total_xp: 100,
            unlocked_badges: vec!["week_warrior".to_string()],
        };
        let first = process_completion(&pre, &event(6, 7));
        assert!(first.new_badges.is_empty());
        let second = process_completion(&first.progress_after, &event(6, 7));
        assert!(second.new_badges.is_empty());
        assert_eq!(
            second.progress_after.unlocked_badges,
            vec!["week_warrior".to_string()]
        );
    }

    #[test]
    fn level_up_signaled_on_threshold_crossing() {
        let pre = UserProgress {
            total_xp: 95,
            unlocked_badges: vec![],
        };
        let reward = process_completion(&pre, &event(1, 2));
        assert_eq!(reward.progress_after.total_xp, 105);
        assert!(reward.level_up);
        assert_eq!(reward.current_level.level, 2);

        let reward = process_completion(&reward.progress_after, &event(2, 3));
        assert!(!reward.level_up);
    }

    #[test]
    fn xp_never_decreases() {
        let mut progress = UserProgress::default();
        for i in 0..100u32 {
            let before = progress.total_xp;
            let reward = process_completion(&progress, &event(i, i + 1));
            progress = reward.progress_after;
            assert!(progress.total_xp >= before);
        }
    }
}
