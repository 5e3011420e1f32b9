use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::open_repository;
use crate::errors::AppResult;
use crate::ui::view::{TaskView, TerminalView};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { json } = cmd {
        let repo = open_repository(cfg, None)?;
        let tasks = repo.list_tasks()?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        } else {
            TerminalView.render(&tasks);
        }

        repo.shutdown()?;
    }
    Ok(())
}
