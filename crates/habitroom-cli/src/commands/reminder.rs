//! Sticky reminder commands.

use clap::Subcommand;
use habitroom_core::{Priority, Reminder, Store};

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Add a reminder
    Add {
        /// Reminder text
        text: String,
        /// Priority: high, medium, or low
        #[arg(long, default_value = "medium")]
        priority: String,
    },
    /// List reminders
    List {
        /// Include completed reminders
        #[arg(long)]
        all: bool,
    },
    /// Mark a reminder done
    Done {
        /// Reminder ID
        id: String,
    },
    /// Delete a reminder
    Delete {
        /// Reminder ID
        id: String,
    },
}

pub fn run(action: ReminderAction) -> Result<(), Box<dyn std::error::Error>> {
    let (_config, mut tracker) = super::open_tracker()?;

    match action {
        ReminderAction::Add { text, priority } => {
            let reminder = Reminder::new(text, Priority::parse(&priority));
            tracker.store_mut().add_reminder(&reminder)?;
            println!("{}", serde_json::to_string_pretty(&reminder)?);
        }
        ReminderAction::List { all } => {
            let reminders = tracker.store().list_reminders(!all)?;
            println!("{}", serde_json::to_string_pretty(&reminders)?);
        }
        ReminderAction::Done { id } => {
            tracker.store_mut().set_reminder_completed(&id, true)?;
            println!("Reminder done: {id}");
        }
        ReminderAction::Delete { id } => {
            tracker.store_mut().delete_reminder(&id)?;
            println!("Reminder deleted: {id}");
        }
    }
    Ok(())
}
