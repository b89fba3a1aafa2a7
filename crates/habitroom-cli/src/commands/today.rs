//! Due-today view.

use chrono::Local;
use habitroom_core::insights::suggestions;
use habitroom_core::Store;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (config, tracker) = super::open_tracker()?;

    let today = Local::now().date_naive();
    let due = tracker.due_on(today)?;
    println!("{}", serde_json::to_string_pretty(&due)?);

    if config.insights.enabled {
        let habits = tracker.store().list_habits(true)?;
        let log = tracker.store().logs_all()?;
        if let Some(tip) = suggestions(&habits, &log).first() {
            println!("{tip}");
        }
    }
    Ok(())
}
