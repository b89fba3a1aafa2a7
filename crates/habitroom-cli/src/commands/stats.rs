//! Streak, completion-rate, and missed-day statistics.

use chrono::Local;
use clap::Subcommand;
use habitroom_core::analytics::{completion_rate, current_streak, logged_dates, missed_in_window};
use habitroom_core::Store;
use serde::Serialize;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Streaks and completion rates for every active habit
    Summary,
    /// Current streak for one habit
    Streak {
        /// Habit ID
        habit_id: String,
    },
    /// Lifetime completion rate for one habit
    Rate {
        /// Habit ID
        habit_id: String,
    },
    /// Missed due dates over the trailing window
    Misses {
        /// Window in days; defaults to the configured value
        #[arg(long)]
        window: Option<u32>,
    },
}

#[derive(Serialize)]
struct HabitStats {
    id: String,
    name: String,
    streak: u32,
    completion_rate: f64,
    total_due: u64,
    total_completions: usize,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let (config, tracker) = super::open_tracker()?;
    let today = Local::now().date_naive();

    match action {
        StatsAction::Summary => {
            let habits = tracker.store().list_habits(true)?;
            let mut summary = Vec::new();
            for habit in &habits {
                let entries = tracker.store().logs_for_habit(&habit.id)?;
                let logged = logged_dates(&entries);
                let (rate, total_due) = completion_rate(habit, &logged, today);
                summary.push(HabitStats {
                    id: habit.id.clone(),
                    name: habit.name.clone(),
                    streak: current_streak(habit, &logged, today),
                    completion_rate: rate,
                    total_due,
                    total_completions: entries.len(),
                });
            }
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::Streak { habit_id } => {
            let habit = tracker
                .store()
                .get_habit(&habit_id)?
                .ok_or_else(|| format!("no habit with id {habit_id}"))?;
            let entries = tracker.store().logs_for_habit(&habit_id)?;
            let streak = current_streak(&habit, &logged_dates(&entries), today);
            println!("{streak}");
        }
        StatsAction::Rate { habit_id } => {
            let habit = tracker
                .store()
                .get_habit(&habit_id)?
                .ok_or_else(|| format!("no habit with id {habit_id}"))?;
            let entries = tracker.store().logs_for_habit(&habit_id)?;
            let (rate, total_due) = completion_rate(&habit, &logged_dates(&entries), today);
            println!(
                "{}",
                serde_json::json!({ "completion_rate": rate, "total_due": total_due })
            );
        }
        StatsAction::Misses { window } => {
            let window_days = window.unwrap_or(config.analytics.window_days);
            let habits = tracker.store().list_habits(true)?;
            let log = tracker.store().logs_all()?;
            let reports = missed_in_window(&habits, &log, window_days, today);
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }
    Ok(())
}
