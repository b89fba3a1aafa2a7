//! XP, level, and badge display.

use clap::Subcommand;
use habitroom_core::gamification::{badge, level_for, next_level, Badge, Level, BADGES};
use habitroom_core::Store;
use serde::Serialize;

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Current XP, level, and progress toward the next level
    Show,
    /// Badge catalog with unlock state
    Badges,
}

#[derive(Serialize)]
struct ProgressView {
    total_xp: u64,
    level: &'static Level,
    next_level: Option<&'static Level>,
    /// XP still needed for the next level; absent at the cap.
    xp_to_next: Option<u64>,
    unlocked_badges: Vec<&'static Badge>,
}

#[derive(Serialize)]
struct BadgeView {
    #[serde(flatten)]
    badge: &'static Badge,
    unlocked: bool,
}

pub fn run(action: ProgressAction) -> Result<(), Box<dyn std::error::Error>> {
    let (_config, tracker) = super::open_tracker()?;
    let progress = tracker.store().progress()?;

    match action {
        ProgressAction::Show => {
            let level = level_for(progress.total_xp);
            let next = next_level(progress.total_xp);
            let view = ProgressView {
                total_xp: progress.total_xp,
                level,
                next_level: next,
                xp_to_next: next.map(|l| l.xp_required - progress.total_xp),
                unlocked_badges: progress
                    .unlocked_badges
                    .iter()
                    .filter_map(|id| badge(id))
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        ProgressAction::Badges => {
            let views: Vec<BadgeView> = BADGES
                .iter()
                .map(|b| BadgeView {
                    badge: b,
                    unlocked: progress.has_badge(b.id),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
    }
    Ok(())
}
