use crate::db::gateway::StorageGateway;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

/// Aggregate numbers about the task store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbInfo {
    pub tasks: i64,
    pub pomodoros: i64,
    pub interruptions: i64,
    pub used_bytes: i64,
    pub quota_bytes: i64,
    pub version: Option<String>,
}

pub fn collect_info(gateway: &StorageGateway) -> AppResult<DbInfo> {
    gateway.with_conn(|conn| {
        let (tasks, pomodoros, interruptions): (i64, i64, i64) = conn.query_row(
            "SELECT COUNT(*), IFNULL(SUM(pomodoros), 0), IFNULL(SUM(interruptions), 0) FROM Messages",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        let page_size: i64 = conn.query_row("PRAGMA page_size", [], |row| row.get(0))?;
        let page_count: i64 = conn.query_row("PRAGMA page_count", [], |row| row.get(0))?;
        let max_pages: i64 = conn.query_row("PRAGMA max_page_count", [], |row| row.get(0))?;

        let version: Option<String> = conn
            .query_row(
                "SELECT value FROM _gateway_meta WHERE key = 'version'",
                [],
                |row| row.get(0),
            )
            .optional()?;

        Ok(DbInfo {
            tasks,
            pomodoros,
            interruptions,
            used_bytes: page_size * page_count,
            quota_bytes: page_size * max_pages,
            version,
        })
    })
}

pub fn print_db_info(gateway: &StorageGateway) -> AppResult<()> {
    let info = collect_info(gateway)?;
    let opts = gateway.options();

    println!();

    //
    // 1) FILE
    //
    let file_size = fs::metadata(&opts.path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!(
        "{}• File:{} {}{}{}",
        CYAN,
        RESET,
        YELLOW,
        opts.path.display(),
        RESET
    );
    println!("{}• Size:{} {:.1} KB", CYAN, RESET, file_kb);
    println!(
        "{}• Name:{} {} ({})",
        CYAN, RESET, opts.name, opts.display_name
    );
    println!(
        "{}• Version:{} {}",
        CYAN,
        RESET,
        info.version
            .clone()
            .unwrap_or_else(|| format!("{GREY}--{RESET}"))
    );

    //
    // 2) QUOTA
    //
    let pct = if info.quota_bytes > 0 {
        info.used_bytes as f64 * 100.0 / info.quota_bytes as f64
    } else {
        0.0
    };
    println!(
        "{}• Quota:{} {} / {} bytes ({:.1}%)",
        CYAN, RESET, info.used_bytes, info.quota_bytes, pct
    );

    //
    // 3) TOTALS
    //
    println!("{}• Tasks:{} {}{}{}", CYAN, RESET, GREEN, info.tasks, RESET);
    println!(
        "{}• Pomodoros:{} {}{}{}",
        CYAN, RESET, GREEN, info.pomodoros, RESET
    );
    println!(
        "{}• Interruptions:{} {}{}{}",
        CYAN, RESET, GREEN, info.interruptions, RESET
    );

    println!();
    Ok(())
}
