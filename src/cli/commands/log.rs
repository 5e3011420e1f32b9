use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::core::open_repository;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        let repo = open_repository(cfg, None)?;
        LogLogic::print_log(repo.gateway())?;
        repo.shutdown()?;
    }

    Ok(())
}
