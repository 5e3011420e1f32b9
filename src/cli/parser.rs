use crate::core::timer::MAX_POMODORO_MINUTES;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rPomodoro
/// Pomodoro timer with a to-do list stored in SQLite
#[derive(Parser, Debug)]
#[command(
    name = "rpomodoro",
    version = env!("CARGO_PKG_VERSION"),
    about = "A Pomodoro timer with a to-do list: track pomodoros and interruptions per task using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (integrity checks, info, vacuum)
    Db {
        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Add a new task
    Add {
        /// Task name (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// List tasks
    List {
        #[arg(long = "json", help = "Print tasks as JSON")]
        json: bool,
    },

    /// Show a single task
    Show {
        /// Task id
        id: String,
    },

    /// Delete a task by ID
    Del {
        /// Task id
        id: String,

        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Record an interruption for a task
    Interrupt {
        /// Task id
        id: String,
    },

    /// Run a pomodoro for a task (Ctrl-C stops it without recording)
    Track {
        /// Task id
        id: String,

        #[arg(
            long = "minutes",
            help = "Pomodoro length in minutes, 1 to 1440 (default from config)",
            value_parser = clap::value_parser!(u64).range(1..=MAX_POMODORO_MINUTES)
        )]
        minutes: Option<u64>,

        /// Wall-clock milliseconds per one-second tick
        #[arg(long = "tick-ms", hide = true)]
        tick_ms: Option<u64>,
    },
}
