//! Parameterized statements over the `Messages` table and row mapping.

use crate::db::gateway::{Record, Tx};
use crate::errors::{ErrorCode, StorageError};
use crate::models::task::{Counter, Task};
use rusqlite::params;

pub const INSERT_TASK: &str =
    "INSERT INTO Messages (name, pomodoros, interruptions) VALUES (?, ?, ?)";

pub const SELECT_TASKS: &str = "SELECT id, name, pomodoros, interruptions FROM Messages";

pub const SELECT_TASK: &str =
    "SELECT id, name, pomodoros, interruptions FROM Messages WHERE id = ?";

pub const INCREMENT_POMODOROS: &str =
    "UPDATE Messages SET pomodoros = IFNULL(pomodoros, 0) + 1 WHERE id = ?";

pub const INCREMENT_INTERRUPTIONS: &str =
    "UPDATE Messages SET interruptions = IFNULL(interruptions, 0) + 1 WHERE id = ?";

pub const DELETE_TASK: &str = "DELETE FROM Messages WHERE id = ?";

pub fn map_task(rec: &Record) -> Result<Task, StorageError> {
    Ok(Task {
        id: rec.get_i64("id")?,
        name: rec.get_text("name")?,
        pomodoros: rec.get_opt_i64("pomodoros")?.unwrap_or(0),
        interruptions: rec.get_opt_i64("interruptions")?.unwrap_or(0),
    })
}

/// Insert a task with zeroed counters, returning its id.
pub fn insert_task(tx: &mut Tx<'_>, name: &str) -> Result<i64, StorageError> {
    let rs = tx.execute(INSERT_TASK, params![name, 0, 0])?;
    rs.insert_id
        .ok_or_else(|| StorageError::new(ErrorCode::Database, "insert did not add a row"))
}

/// All tasks, in the store's natural order.
pub fn load_tasks(tx: &mut Tx<'_>) -> Result<Vec<Task>, StorageError> {
    let rs = tx.execute(SELECT_TASKS, &[])?;
    rs.rows.iter().map(map_task).collect()
}

pub fn load_task(tx: &mut Tx<'_>, id: i64) -> Result<Option<Task>, StorageError> {
    let rs = tx.execute(SELECT_TASK, params![id])?;
    rs.rows.first().map(map_task).transpose()
}

/// Add one to `counter` in a single statement.
/// Returns the new value, or `None` when no task has this id.
pub fn increment_counter(
    tx: &mut Tx<'_>,
    id: i64,
    counter: Counter,
) -> Result<Option<i64>, StorageError> {
    let sql = match counter {
        Counter::Pomodoros => INCREMENT_POMODOROS,
        Counter::Interruptions => INCREMENT_INTERRUPTIONS,
    };

    if tx.execute(sql, params![id])?.rows_affected == 0 {
        return Ok(None);
    }

    let task = load_task(tx, id)?;
    Ok(task.map(|t| match counter {
        Counter::Pomodoros => t.pomodoros,
        Counter::Interruptions => t.interruptions,
    }))
}

/// Returns `false` when no task had this id.
pub fn delete_task(tx: &mut Tx<'_>, id: i64) -> Result<bool, StorageError> {
    Ok(tx.execute(DELETE_TASK, params![id])?.rows_affected > 0)
}
