//! Rendering of tasks and timer progress.

use crate::models::progress::Progress;
use crate::models::task::Task;
use crate::utils::colors::{CYAN, GREEN, GREY, RED, RESET, YELLOW, color_for_count};
use crate::utils::formatting::bold;
use crate::utils::table::{Column, Table};
use std::io::{self, Write};

/// View collaborator fed by the repository and the timer engine.
pub trait TaskView {
    fn render(&self, tasks: &[Task]);
    fn render_detail(&self, task: &Task);
    fn render_progress(&self, progress: &Progress);
}

/// Width of the textual progress bar.
const BAR_WIDTH: usize = 30;

/// Glyph approximating the pie chart for a given progress.
pub fn pie_glyph(progress: &Progress) -> char {
    let deg = progress.degrees();
    if progress.past_half() {
        if deg >= 360.0 { '●' } else if deg >= 270.0 { '◕' } else { '◑' }
    } else if deg >= 90.0 {
        '◔'
    } else {
        '○'
    }
}

pub fn progress_bar(progress: &Progress) -> String {
    let filled = ((progress.percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled)
    )
}

/// Render the task list as a table.
pub fn tasks_table(tasks: &[Task]) -> String {
    let mut table = Table::new(vec![
        Column::right("ID", 6),
        Column::left("TASK", 40),
        Column::right("POMODOROS", 9),
        Column::right("INTERRUPTIONS", 13),
    ]);

    for t in tasks {
        table.add_row(vec![
            t.id.to_string(),
            t.name.clone(),
            t.pomodoros.to_string(),
            t.interruptions.to_string(),
        ]);
    }

    table.render()
}

/// Plain terminal output.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalView;

impl TaskView for TerminalView {
    fn render(&self, tasks: &[Task]) {
        if tasks.is_empty() {
            println!("{GREY}No tasks yet. Use `rpomodoro add <NAME>` to enter a task.{RESET}");
            return;
        }
        print!("{}", tasks_table(tasks));
    }

    fn render_detail(&self, task: &Task) {
        println!("{} {}", bold(&format!("#{}", task.id)), bold(&task.name));
        println!(
            "  Pomodoros:     {}{}{}",
            color_for_count(task.pomodoros, GREEN),
            task.pomodoros,
            RESET
        );
        println!(
            "  Interruptions: {}{}{}",
            color_for_count(task.interruptions, RED),
            task.interruptions,
            RESET
        );
    }

    fn render_progress(&self, progress: &Progress) {
        let color = if progress.past_half() { YELLOW } else { CYAN };
        print!(
            "\r{}{} {}{} {:5.1}%  {}",
            color,
            pie_glyph(progress),
            progress_bar(progress),
            RESET,
            progress.percent,
            progress.remaining()
        );
        let _ = io::stdout().flush();
    }
}
