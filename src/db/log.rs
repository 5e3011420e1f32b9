use crate::db::gateway::Tx;
use crate::errors::StorageError;
use chrono::Local;
use rusqlite::params;

/// Rows kept in the `log` table; older ones are dropped as new ones arrive.
pub const LOG_RETENTION_ROWS: i64 = 200;

const INSERT_LOG: &str = "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)";

const PRUNE_LOG: &str = "DELETE FROM log WHERE id <= (SELECT MAX(id) FROM log) - ?1";

/// Write an internal log line into the `log` table, inside the caller's transaction.
///
/// The oldest rows are pruned first, so the log never grows past
/// [`LOG_RETENTION_ROWS`] and the pages it frees are reused by the insert.
pub fn ttlog(
    tx: &mut Tx<'_>,
    operation: &str,
    target: &str,
    message: &str,
) -> Result<(), StorageError> {
    tx.execute(PRUNE_LOG, params![LOG_RETENTION_ROWS - 1])?;

    // Local timestamp, RFC 3339
    let now = Local::now().to_rfc3339();
    tx.execute(INSERT_LOG, params![now, operation, target, message])?;
    Ok(())
}
