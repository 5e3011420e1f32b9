use crate::cli::commands::parse_id;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::open_repository;
use crate::errors::AppResult;
use crate::ui::view::{TaskView, TerminalView};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Show { id } = cmd {
        let id = parse_id(id)?;
        let repo = open_repository(cfg, None)?;
        let task = repo.get_task(id)?;
        TerminalView.render_detail(&task);
        repo.shutdown()?;
    }
    Ok(())
}
