use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::open_repository;
use crate::errors::{AppError, AppResult};
use crate::models::task::Task;
use crate::ui::messages::success;
use crate::ui::view::TerminalView;

/// Add a task; the repository refreshes the list on the terminal view.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add { name } = cmd {
        let name = name.join(" ");

        // Reject blank input before the store is even opened
        let name = Task::clean_name(&name).ok_or(AppError::Validation { field: "name" })?;

        let repo = open_repository(cfg, Some(Box::new(TerminalView)))?;
        let id = repo.create_task(&name)?;
        success(format!("Task #{} added: {}", id, name));
        repo.shutdown()?;
    }

    Ok(())
}
