pub mod add;
pub mod config;
pub mod db;
pub mod del;
pub mod init;
pub mod interrupt;
pub mod list;
pub mod log;
pub mod show;
pub mod track;

use crate::errors::{AppError, AppResult};

/// Parse a task id given on the command line.
pub(crate) fn parse_id(raw: &str) -> AppResult<i64> {
    raw.trim()
        .trim_start_matches('#')
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::InvalidId(raw.to_string()))
}
