use crate::cli::commands::parse_id;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::open_repository;
use crate::errors::AppResult;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Interrupt { id } = cmd {
        let id = parse_id(id)?;
        let repo = open_repository(cfg, None)?;
        let count = repo.increment_interruption(id)?;
        info(format!("Task #{}: Interruptions: {}", id, count));
        repo.shutdown()?;
    }
    Ok(())
}
