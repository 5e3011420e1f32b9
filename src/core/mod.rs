pub mod clock;
pub mod log;
pub mod repository;
pub mod timer;

use crate::config::Config;
use crate::db::gateway::StorageGateway;
use crate::errors::AppResult;
use crate::ui::view::TaskView;
use repository::TaskRepository;

/// Open the configured database and wrap it in a repository.
pub fn open_repository(cfg: &Config, view: Option<Box<dyn TaskView>>) -> AppResult<TaskRepository> {
    let gateway = StorageGateway::open(&cfg.db_options())?;
    match view {
        Some(v) => TaskRepository::with_view(gateway, v),
        None => TaskRepository::new(gateway),
    }
}
