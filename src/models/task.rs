use serde::{Deserialize, Serialize};

/// A persisted to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,              // ⇔ Messages.id (INTEGER PRIMARY KEY)
    pub name: String,         // ⇔ Messages.name
    pub pomodoros: i64,       // ⇔ Messages.pomodoros
    pub interruptions: i64,   // ⇔ Messages.interruptions
}

impl Task {
    /// Normalize user input for a task name.
    /// Returns `None` when nothing but whitespace is left.
    pub fn clean_name(raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Which counter an increment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Pomodoros,
    Interruptions,
}

impl Counter {
    /// Column name in the `Messages` table.
    pub fn column(&self) -> &'static str {
        match self {
            Counter::Pomodoros => "pomodoros",
            Counter::Interruptions => "interruptions",
        }
    }

    /// Operation name written to the audit log.
    pub fn operation(&self) -> &'static str {
        match self {
            Counter::Pomodoros => "pomodoro",
            Counter::Interruptions => "interrupt",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_name_rejects_blank_input() {
        assert_eq!(Task::clean_name(""), None);
        assert_eq!(Task::clean_name("   \t"), None);
        assert_eq!(Task::clean_name("  write report "), Some("write report".into()));
    }
}
