//! Completion logging commands.

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use habitroom_core::analytics::{current_streak, logged_dates};
use habitroom_core::insights::{message_rng, motivational_message};
use habitroom_core::Store;

#[derive(Subcommand)]
pub enum LogAction {
    /// Record a completion for a habit
    Done {
        /// Habit ID
        habit_id: String,
        /// Completion date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Amount completed
        #[arg(long, default_value = "1")]
        value: u32,
        /// Free-text note
        #[arg(long)]
        notes: Option<String>,
    },
    /// List completions for a habit
    List {
        /// Habit ID
        habit_id: String,
    },
}

pub fn run(action: LogAction) -> Result<(), Box<dyn std::error::Error>> {
    let (config, mut tracker) = super::open_tracker()?;

    match action {
        LogAction::Done {
            habit_id,
            date,
            value,
            notes,
        } => {
            let today = Local::now().date_naive();
            let date = date.unwrap_or(today);
            let reward = tracker.complete_habit(&habit_id, date, value.max(1), notes, today)?;
            println!("{}", serde_json::to_string_pretty(&reward)?);

            if config.insights.enabled {
                let habit = tracker
                    .store()
                    .get_habit(&habit_id)?
                    .ok_or("habit vanished mid-command")?;
                let entries = tracker.store().logs_for_habit(&habit_id)?;
                let streak = current_streak(&habit, &logged_dates(&entries), today);
                let mut rng = message_rng(config.insights.seed);
                println!("{}", motivational_message(streak, &mut rng));
            }
        }
        LogAction::List { habit_id } => {
            let entries = tracker.store().logs_for_habit(&habit_id)?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}
