use crate::db::gateway::StorageGateway;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use std::sync::LazyLock;

/// Widest op+target column before truncation.
const OP_MAX_WIDTH: usize = 60;

static ANSI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("ANSI pattern is valid"));

fn strip_ansi(s: &str) -> String {
    ANSI_RE.replace_all(s, "").into_owned()
}

/// Colour for each audited operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" => Colour::Green,
        "del" => Colour::Red,
        "pomodoro" => Colour::Cyan,
        "interrupt" => Colour::Yellow,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

pub struct LogLogic;

impl LogLogic {
    pub fn entries(gateway: &StorageGateway) -> AppResult<Vec<LogEntry>> {
        gateway.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
            )?;

            let rows = stmt.query_map([], |row| {
                let raw_date: String = row.get(1)?;
                let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or(raw_date);

                Ok(LogEntry {
                    id: row.get(0)?,
                    date,
                    operation: row.get(2)?,
                    target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                    message: row.get(4)?,
                })
            })?;

            rows.collect()
        })
    }

    /// Format one entry; only the operation word is coloured.
    fn format_entry(e: &LogEntry, id_w: usize, date_w: usize, op_w: usize) -> String {
        let op_target = if e.target.is_empty() {
            e.operation.clone()
        } else {
            format!("{} ({})", e.operation, e.target)
        };

        let visible = if op_target.chars().count() > op_w {
            let mut s = op_target.chars().take(op_w.saturating_sub(3)).collect::<String>();
            s.push_str("...");
            s
        } else {
            op_target
        };

        let color = color_for_operation(&e.operation);
        let colored = match visible.split_once(' ') {
            Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
            None => color.paint(visible.as_str()).to_string(),
        };

        let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&colored).chars().count()));

        format!(
            "{:>id_w$}: {:<date_w$} | {}{} => {}",
            e.id,
            e.date,
            colored,
            padding,
            e.message,
            id_w = id_w,
            date_w = date_w
        )
    }

    pub fn print_log(gateway: &StorageGateway) -> AppResult<()> {
        let entries = Self::entries(gateway)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let op_w = entries
            .iter()
            .map(|e| e.operation.len() + e.target.len() + 3)
            .max()
            .unwrap_or(10)
            .min(OP_MAX_WIDTH);
        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");
        for e in &entries {
            println!("{}", Self::format_entry(e, id_w, date_w, op_w));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_ansi_removes_color_codes() {
        let painted = Colour::Red.paint("del").to_string();
        assert_eq!(strip_ansi(&painted), "del");
    }

    #[test]
    fn long_targets_are_cut() {
        let e = LogEntry {
            id: 7,
            date: "2026-10-19T10:00:00+02:00".into(),
            operation: "add".into(),
            target: "task #7".into(),
            message: "x".into(),
        };
        let line = LogLogic::format_entry(&e, 1, 25, 8);
        assert!(strip_ansi(&line).contains("add (..."));
    }
}
