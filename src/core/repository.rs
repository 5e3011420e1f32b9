use crate::db::gateway::{SchemaStatus, StorageGateway};
use crate::db::log::ttlog;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::task::{Counter, Task};
use crate::ui::view::TaskView;
use tracing::{debug, warn};

/// Receiver of completed pomodoros.
pub trait PomodoroLedger {
    /// Add one completed pomodoro to `task_id`, returning the new count.
    fn increment_pomodoro(&self, task_id: i64) -> AppResult<i64>;
}

/// Task operations on top of the storage gateway.
pub struct TaskRepository {
    gateway: StorageGateway,
    view: Option<Box<dyn TaskView>>,
}

impl TaskRepository {
    /// Wrap `gateway`, creating the schema when missing.
    pub fn new(gateway: StorageGateway) -> AppResult<Self> {
        Self::build(gateway, None)
    }

    /// Like [`new`](Self::new), with a view refreshed after list-changing operations.
    /// A freshly created schema triggers an initial refresh.
    pub fn with_view(gateway: StorageGateway, view: Box<dyn TaskView>) -> AppResult<Self> {
        Self::build(gateway, Some(view))
    }

    fn build(gateway: StorageGateway, view: Option<Box<dyn TaskView>>) -> AppResult<Self> {
        let status = gateway.ensure_schema()?;
        let repo = Self { gateway, view };
        if status == SchemaStatus::Created {
            repo.refresh()?;
        }
        Ok(repo)
    }

    pub fn gateway(&self) -> &StorageGateway {
        &self.gateway
    }

    pub fn list_tasks(&self) -> AppResult<Vec<Task>> {
        self.gateway
            .transaction(|tx| Ok(queries::load_tasks(tx)?))
    }

    pub fn get_task(&self, id: i64) -> AppResult<Task> {
        self.gateway
            .transaction(|tx| queries::load_task(tx, id)?.ok_or(AppError::NotFound(id)))
    }

    /// Persist a new task with zeroed counters.
    ///
    /// Blank names are rejected before any storage access. The list refresh
    /// runs in its own transaction, after the insert has committed; a failed
    /// refresh is logged and does not undo the insert.
    pub fn create_task(&self, name: &str) -> AppResult<i64> {
        let name = Task::clean_name(name).ok_or(AppError::Validation { field: "name" })?;

        let id = self.gateway.transaction(|tx| {
            let id = queries::insert_task(tx, &name)?;
            ttlog(tx, "add", &format!("task #{id}"), &name)?;
            Ok(id)
        })?;
        debug!(id, %name, "task created");

        self.refresh_after_commit("add");
        Ok(id)
    }

    pub fn increment_pomodoro(&self, id: i64) -> AppResult<i64> {
        self.increment(id, Counter::Pomodoros)
    }

    pub fn increment_interruption(&self, id: i64) -> AppResult<i64> {
        self.increment(id, Counter::Interruptions)
    }

    fn increment(&self, id: i64, counter: Counter) -> AppResult<i64> {
        let value = self.gateway.transaction(|tx| {
            let value =
                queries::increment_counter(tx, id, counter)?.ok_or(AppError::NotFound(id))?;
            ttlog(
                tx,
                counter.operation(),
                &format!("task #{id}"),
                &format!("{} = {}", counter.column(), value),
            )?;
            Ok(value)
        })?;

        debug!(id, counter = counter.column(), value, "counter incremented");
        Ok(value)
    }

    pub fn delete_task(&self, id: i64) -> AppResult<()> {
        self.gateway.transaction(|tx| {
            if !queries::delete_task(tx, id)? {
                return Err(AppError::NotFound(id));
            }
            ttlog(tx, "del", &format!("task #{id}"), "Task deleted")?;
            Ok(())
        })?;
        debug!(id, "task deleted");

        self.refresh_after_commit("del");
        Ok(())
    }

    /// Re-read the list and hand it to the attached view.
    pub fn refresh(&self) -> AppResult<Vec<Task>> {
        let tasks = self.list_tasks()?;
        if let Some(view) = &self.view {
            view.render(&tasks);
        }
        Ok(tasks)
    }

    fn refresh_after_commit(&self, operation: &str) {
        if let Err(e) = self.refresh() {
            warn!(operation, error = %e, "list refresh failed after commit");
        }
    }

    pub fn shutdown(self) -> AppResult<()> {
        self.gateway.shutdown()
    }
}

impl PomodoroLedger for TaskRepository {
    fn increment_pomodoro(&self, task_id: i64) -> AppResult<i64> {
        TaskRepository::increment_pomodoro(self, task_id)
    }
}
