use crate::cli::commands::parse_id;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::open_repository;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::ui::view::TerminalView;

use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { id, yes } = cmd {
        let id = parse_id(id)?;
        let repo = open_repository(cfg, Some(Box::new(TerminalView)))?;

        // Fails with NotFound before asking anything
        let task = repo.get_task(id)?;

        let prompt = format!(
            "Delete task #{} \"{}\"? This action is irreversible.",
            task.id, task.name
        );
        if !*yes && !ask_confirmation(&prompt) {
            info("Deletion cancelled.");
            return Ok(());
        }

        repo.delete_task(id)?;
        success(format!("Task #{} deleted", id));
        repo.shutdown()?;
    }

    Ok(())
}
