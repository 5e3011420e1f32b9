//! DDL and bookkeeping statements owned by the storage gateway.

pub const TASK_TABLE: &str = "Messages";

pub const TABLE_EXISTS: &str = "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?";

pub const CREATE_MESSAGES: &str = "CREATE TABLE IF NOT EXISTS Messages (
    id            INTEGER PRIMARY KEY,
    name          TEXT,
    pomodoros     INTEGER,
    interruptions INTEGER
)";

/// Internal audit log, one row per mutation.
pub const CREATE_LOG: &str = "CREATE TABLE IF NOT EXISTS log (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    date      TEXT NOT NULL,
    operation TEXT NOT NULL,
    target    TEXT DEFAULT '',
    message   TEXT NOT NULL
)";

pub const CREATE_META: &str = "CREATE TABLE IF NOT EXISTS _gateway_meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
)";

pub const SELECT_META: &str = "SELECT value FROM _gateway_meta WHERE key = ?1";

pub const UPSERT_META: &str = "INSERT OR REPLACE INTO _gateway_meta (key, value) VALUES (?1, ?2)";
