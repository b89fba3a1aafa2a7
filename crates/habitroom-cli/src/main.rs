use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod commands;

#[derive(Parser)]
#[command(name = "habitroom-cli", version, about = "Habitroom CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Completion logging
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Habits due today
    Today,
    /// Streak, completion-rate, and missed-day statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// XP, level, and badges
    Progress {
        #[command(subcommand)]
        action: commands::progress::ProgressAction,
    },
    /// Sticky reminders
    Reminder {
        #[command(subcommand)]
        action: commands::reminder::ReminderAction,
    },
    /// Project tracking
    Project {
        #[command(subcommand)]
        action: commands::project::ProjectAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Log { action } => commands::log::run(action),
        Commands::Today => commands::today::run(),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Progress { action } => commands::progress::run(action),
        Commands::Reminder { action } => commands::reminder::run(action),
        Commands::Project { action } => commands::project::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "habitroom-cli",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
