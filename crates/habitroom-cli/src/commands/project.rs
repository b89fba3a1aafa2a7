//! Project tracking commands.

use clap::Subcommand;
use habitroom_core::{Priority, Project, Store};

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Add a project
    Add {
        /// Project title
        title: String,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
        /// Priority: high, medium, or low
        #[arg(long, default_value = "medium")]
        priority: String,
    },
    /// List projects
    List {
        /// Include completed projects
        #[arg(long)]
        all: bool,
    },
    /// Mark a project done
    Done {
        /// Project ID
        id: String,
    },
    /// Delete a project
    Delete {
        /// Project ID
        id: String,
    },
}

pub fn run(action: ProjectAction) -> Result<(), Box<dyn std::error::Error>> {
    let (_config, mut tracker) = super::open_tracker()?;

    match action {
        ProjectAction::Add {
            title,
            description,
            priority,
        } => {
            let project = Project::new(title, description, Priority::parse(&priority));
            tracker.store_mut().add_project(&project)?;
            println!("{}", serde_json::to_string_pretty(&project)?);
        }
        ProjectAction::List { all } => {
            let projects = tracker.store().list_projects(!all)?;
            println!("{}", serde_json::to_string_pretty(&projects)?);
        }
        ProjectAction::Done { id } => {
            tracker.store_mut().set_project_completed(&id, true)?;
            println!("Project done: {id}");
        }
        ProjectAction::Delete { id } => {
            tracker.store_mut().delete_project(&id)?;
            println!("Project deleted: {id}");
        }
    }
    Ok(())
}
