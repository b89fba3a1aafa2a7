//! Habit management commands.

use clap::Subcommand;
use habitroom_core::{Category, Habit, Recurrence, Store};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,
        /// Category: health, productivity, learning, mindfulness, or other
        #[arg(long, default_value = "other")]
        category: String,
        /// Recurrence kind: daily, days_of_week, weekly, biweekly, monthly,
        /// bimonthly, or custom
        #[arg(long, default_value = "daily")]
        repeat: String,
        /// Recurrence parameter: weekday list like "Mon,Wed,Fri", a single
        /// weekday, a day of month, or an interval in days
        #[arg(long)]
        every: Option<String>,
        /// Target amount per due day
        #[arg(long, default_value = "1")]
        target: u32,
        /// Unit for the target amount
        #[arg(long, default_value = "times")]
        unit: String,
    },
    /// List habits
    List {
        /// Include archived habits
        #[arg(long)]
        all: bool,
    },
    /// Get habit details
    Get {
        /// Habit ID
        id: String,
    },
    /// Update a habit
    Update {
        /// Habit ID
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New category
        #[arg(long)]
        category: Option<String>,
        /// New recurrence kind
        #[arg(long)]
        repeat: Option<String>,
        /// New recurrence parameter
        #[arg(long)]
        every: Option<String>,
        /// New target amount
        #[arg(long)]
        target: Option<u32>,
        /// New target unit
        #[arg(long)]
        unit: Option<String>,
    },
    /// Archive a habit (soft delete; history is kept)
    Archive {
        /// Habit ID
        id: String,
    },
}

/// Parse a recurrence from CLI flags, rejecting input that would fail
/// closed to a never-due habit.
fn parse_recurrence(
    repeat: &str,
    every: Option<&str>,
) -> Result<Recurrence, Box<dyn std::error::Error>> {
    let recurrence = Recurrence::from_parts(repeat, every);
    if recurrence == Recurrence::Never {
        return Err(format!(
            "invalid recurrence: kind '{repeat}' with parameter {:?}",
            every
        )
        .into());
    }
    Ok(recurrence)
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let (_config, mut tracker) = super::open_tracker()?;

    match action {
        HabitAction::Add {
            name,
            category,
            repeat,
            every,
            target,
            unit,
        } => {
            let recurrence = parse_recurrence(&repeat, every.as_deref())?;
            let mut habit = Habit::new(name, Category::parse(&category), recurrence);
            habit.target_value = target.max(1);
            habit.target_unit = unit;
            tracker.store_mut().add_habit(&habit)?;
            println!("Habit created: {}", habit.id);
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::List { all } => {
            let habits = tracker.store().list_habits(!all)?;
            println!("{}", serde_json::to_string_pretty(&habits)?);
        }
        HabitAction::Get { id } => match tracker.store().get_habit(&id)? {
            Some(habit) => println!("{}", serde_json::to_string_pretty(&habit)?),
            None => return Err(format!("no habit with id {id}").into()),
        },
        HabitAction::Update {
            id,
            name,
            category,
            repeat,
            every,
            target,
            unit,
        } => {
            let mut habit = tracker
                .store()
                .get_habit(&id)?
                .ok_or_else(|| format!("no habit with id {id}"))?;

            if let Some(name) = name {
                habit.name = name;
            }
            if let Some(category) = category {
                habit.category = Category::parse(&category);
            }
            if repeat.is_some() || every.is_some() {
                let (kind, value) = habit.recurrence.to_parts();
                let kind = repeat.unwrap_or_else(|| kind.to_string());
                let value = every.or(value);
                habit.recurrence = parse_recurrence(&kind, value.as_deref())?;
            }
            if let Some(target) = target {
                habit.target_value = target.max(1);
            }
            if let Some(unit) = unit {
                habit.target_unit = unit;
            }

            tracker.store_mut().update_habit(&habit)?;
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::Archive { id } => {
            if tracker.store().get_habit(&id)?.is_none() {
                return Err(format!("no habit with id {id}").into());
            }
            tracker.store_mut().archive_habit(&id)?;
            println!("Habit archived: {id}");
        }
    }
    Ok(())
}
