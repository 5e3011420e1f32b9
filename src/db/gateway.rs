//! Storage gateway: the single owner of the SQLite connection.
//!
//! Every query runs inside [`StorageGateway::transaction`]; statements go
//! through [`Tx::execute`] (or [`Tx::execute_with`] when the caller wants
//! to decide whether a failing statement aborts the transaction).

use crate::db::schema;
use crate::errors::{AppError, AppResult, ErrorCode, StorageError, TransactionError};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, ToSql, Transaction, params};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// Parameters used to open the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbOptions {
    pub path: PathBuf,
    pub name: String,
    pub version: String,
    pub display_name: String,
    /// Quota: the database file may not grow past this size.
    pub size_bytes: u64,
}

impl DbOptions {
    /// Defaults matching a fresh configuration, for a file at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            name: "Pomodoro1".into(),
            version: "1.0".into(),
            display_name: "Pomodoro To-Do".into(),
            size_bytes: 2 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    /// The task table did not exist and has just been created.
    Created,
    Existing,
}

/// Decision returned by a statement error handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Recovery {
    /// Propagate the error; the whole transaction is rolled back.
    #[default]
    Abort,
    /// Swallow the error, undo only the failed statement and keep going.
    Continue,
}

/// One result row. Values are looked up by column name.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    fn require(&self, column: &str) -> Result<&Value, StorageError> {
        self.get(column).ok_or_else(|| {
            StorageError::new(ErrorCode::Database, format!("no such column: {column}"))
        })
    }

    /// Integer column; NULL reads as `None`.
    pub fn get_opt_i64(&self, column: &str) -> Result<Option<i64>, StorageError> {
        match self.require(column)? {
            Value::Integer(i) => Ok(Some(*i)),
            Value::Null => Ok(None),
            other => Err(StorageError::new(
                ErrorCode::Database,
                format!("column {column} is not an integer: {other:?}"),
            )),
        }
    }

    pub fn get_i64(&self, column: &str) -> Result<i64, StorageError> {
        self.get_opt_i64(column)?.ok_or_else(|| {
            StorageError::new(ErrorCode::Database, format!("column {column} is NULL"))
        })
    }

    /// Text column; NULL reads as an empty string.
    pub fn get_text(&self, column: &str) -> Result<String, StorageError> {
        match self.require(column)? {
            Value::Text(s) => Ok(s.clone()),
            Value::Null => Ok(String::new()),
            Value::Integer(i) => Ok(i.to_string()),
            Value::Real(f) => Ok(f.to_string()),
            Value::Blob(_) => Err(StorageError::new(
                ErrorCode::Database,
                format!("column {column} holds a blob"),
            )),
        }
    }
}

/// Outcome of one statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub rows: Vec<Record>,
    pub rows_affected: usize,
    /// Row id of the inserted row, for INSERT statements that added one.
    pub insert_id: Option<i64>,
}

/// Transaction-scoped statement executor.
pub struct Tx<'c> {
    inner: Transaction<'c>,
}

impl Tx<'_> {
    pub fn execute(&mut self, sql: &str, params: &[&dyn ToSql]) -> Result<ResultSet, StorageError> {
        debug!(sql, params = params.len(), "execute");
        run_statement(&self.inner, sql, params).map_err(|e| {
            let err = StorageError::from(e);
            debug!(%err, "statement failed");
            err
        })
    }

    /// Run one statement and hand its outcome to exactly one of the callbacks.
    ///
    /// When `on_error` answers [`Recovery::Continue`] the statement's effects are
    /// rolled back to a savepoint and `Ok(None)` is returned, leaving the
    /// enclosing transaction usable.
    pub fn execute_with<R, F, E>(
        &mut self,
        sql: &str,
        params: &[&dyn ToSql],
        on_result: F,
        on_error: E,
    ) -> Result<Option<R>, StorageError>
    where
        F: FnOnce(&ResultSet) -> R,
        E: FnOnce(&StorageError) -> Recovery,
    {
        debug!(sql, params = params.len(), "execute (guarded)");
        let sp = self.inner.savepoint()?;

        match run_statement(&sp, sql, params) {
            Ok(rs) => {
                sp.commit()?;
                Ok(Some(on_result(&rs)))
            }
            Err(e) => {
                let err = StorageError::from(e);
                // default drop behavior rolls back to the savepoint
                sp.finish()?;
                match on_error(&err) {
                    Recovery::Continue => {
                        warn!(%err, sql, "statement error swallowed, transaction continues");
                        Ok(None)
                    }
                    Recovery::Abort => Err(err),
                }
            }
        }
    }
}

fn is_insert(sql: &str) -> bool {
    let head = sql.trim_start();
    ["insert", "replace"].iter().any(|kw| {
        head.get(..kw.len())
            .is_some_and(|p| p.eq_ignore_ascii_case(kw))
    })
}

fn run_statement(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> rusqlite::Result<ResultSet> {
    let mut stmt = conn.prepare_cached(sql)?;

    let expected = stmt.parameter_count();
    if expected != params.len() {
        return Err(rusqlite::Error::InvalidParameterCount(params.len(), expected));
    }

    if stmt.column_count() > 0 {
        let columns: Arc<[String]> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut rows = stmt.query(params)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let values = (0..columns.len())
                .map(|i| row.get::<_, Value>(i))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            out.push(Record {
                columns: Arc::clone(&columns),
                values,
            });
        }

        return Ok(ResultSet {
            rows: out,
            rows_affected: 0,
            insert_id: None,
        });
    }

    let affected = stmt.execute(params)?;
    let insert_id = (affected > 0 && is_insert(sql)).then(|| conn.last_insert_rowid());

    Ok(ResultSet {
        rows: Vec::new(),
        rows_affected: affected,
        insert_id,
    })
}

/// Owner of the single connection handle.
///
/// The connection sits behind a mutex so that every caller is serialized,
/// whichever thread it runs on.
pub struct StorageGateway {
    conn: Mutex<Connection>,
    options: DbOptions,
}

impl StorageGateway {
    /// Open (or create) the database described by `options`.
    /// Opening an existing database leaves its data untouched.
    pub fn open(options: &DbOptions) -> AppResult<Self> {
        if let Some(parent) = options.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&options.path).map_err(TransactionError::from)?;
        Self::with_connection(conn, options)
    }

    /// Private in-memory database; data is lost on shutdown.
    pub fn open_in_memory(options: &DbOptions) -> AppResult<Self> {
        let conn = Connection::open_in_memory().map_err(TransactionError::from)?;
        Self::with_connection(conn, options)
    }

    fn with_connection(conn: Connection, options: &DbOptions) -> AppResult<Self> {
        apply_quota(&conn, options.size_bytes)?;
        check_version(&conn, options)?;

        debug!(
            name = %options.name,
            version = %options.version,
            path = %options.path.display(),
            "database opened"
        );

        Ok(Self {
            conn: Mutex::new(conn),
            options: options.clone(),
        })
    }

    pub fn options(&self) -> &DbOptions {
        &self.options
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| {
            AppError::Transaction(TransactionError::new(
                ErrorCode::Unknown,
                "connection lock poisoned",
            ))
        })
    }

    /// Create the task table (and the internal log table) when missing.
    pub fn ensure_schema(&self) -> AppResult<SchemaStatus> {
        let status = self.transaction(|tx| {
            let existed = !tx
                .execute(schema::TABLE_EXISTS, params![schema::TASK_TABLE])?
                .rows
                .is_empty();
            tx.execute(schema::CREATE_MESSAGES, &[])?;
            tx.execute(schema::CREATE_LOG, &[])?;

            Ok(if existed {
                SchemaStatus::Existing
            } else {
                SchemaStatus::Created
            })
        })?;

        debug!(?status, "schema ensured");
        Ok(status)
    }

    /// Run `work` inside one transaction.
    ///
    /// Everything `work` executes is committed together when it returns `Ok`;
    /// an `Err` rolls all of it back and is returned unchanged.
    pub fn transaction<T, F>(&self, work: F) -> AppResult<T>
    where
        F: FnOnce(&mut Tx<'_>) -> AppResult<T>,
    {
        let mut conn = self.lock()?;
        let inner = conn.transaction().map_err(TransactionError::from)?;
        let mut tx = Tx { inner };

        match work(&mut tx) {
            Ok(value) => {
                tx.inner.commit().map_err(TransactionError::from)?;
                debug!("transaction committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(e) = tx.inner.rollback() {
                    warn!(error = %e, "rollback failed");
                }
                debug!(%err, "transaction rolled back");
                Err(err)
            }
        }
    }

    /// Callback flavour of [`transaction`](Self::transaction): either the value
    /// is returned or `on_error` is invoked, never both.
    pub fn run_transaction<T, F, E>(&self, work: F, on_error: E) -> Option<T>
    where
        F: FnOnce(&mut Tx<'_>) -> AppResult<T>,
        E: FnOnce(&AppError),
    {
        match self.transaction(work) {
            Ok(value) => Some(value),
            Err(err) => {
                on_error(&err);
                None
            }
        }
    }

    /// Helper to execute a closure with the raw connection, outside any
    /// transaction (maintenance commands such as VACUUM need this).
    pub fn with_conn<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = self.lock()?;
        Ok(func(&conn)?)
    }

    /// Close the connection, reporting any error the store raises on close.
    pub fn shutdown(self) -> AppResult<()> {
        let conn = self.conn.into_inner().map_err(|_| {
            AppError::Transaction(TransactionError::new(
                ErrorCode::Unknown,
                "connection lock poisoned",
            ))
        })?;
        conn.close()
            .map_err(|(_, e)| AppError::Transaction(TransactionError::from(e)))?;
        debug!("database closed");
        Ok(())
    }
}

/// Cap the database size at `size_bytes` (rounded up to whole pages).
fn apply_quota(conn: &Connection, size_bytes: u64) -> Result<(), TransactionError> {
    let page_size: i64 = conn.query_row("PRAGMA page_size", [], |row| row.get(0))?;
    let page_size = page_size.max(1) as u64;
    let pages = size_bytes.div_ceil(page_size).max(1);

    let applied: i64 =
        conn.pragma_update_and_check(None, "max_page_count", pages as i64, |row| row.get(0))?;
    debug!(requested = pages, applied, "page quota set");
    Ok(())
}

/// Record name/version on first open; refuse a different version afterwards.
fn check_version(conn: &Connection, options: &DbOptions) -> Result<(), TransactionError> {
    conn.execute_batch(schema::CREATE_META)?;

    let recorded: Option<String> = conn
        .query_row(schema::SELECT_META, ["version"], |row| row.get(0))
        .optional()?;

    match recorded {
        None => {
            for (key, value) in [
                ("name", &options.name),
                ("version", &options.version),
                ("display_name", &options.display_name),
            ] {
                conn.execute(schema::UPSERT_META, params![key, value])?;
            }
            Ok(())
        }
        Some(current) if !options.version.is_empty() && current != options.version => {
            Err(TransactionError::new(
                ErrorCode::Version,
                format!(
                    "current version of the database ({current}) does not match requested version ({})",
                    options.version
                ),
            ))
        }
        Some(_) => Ok(()),
    }
}
