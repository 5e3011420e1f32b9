//! Progress snapshot emitted by the timer engine on every tick.

use crate::utils::time::format_mm_ss;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub task_id: i64,
    pub elapsed_ms: u64,
    pub duration_ms: u64,
    /// Raw completion, 0.0 ..= 100.0
    pub percent: f64,
}

impl Progress {
    pub fn new(task_id: i64, elapsed_ms: u64, duration_ms: u64) -> Self {
        let percent = if duration_ms == 0 {
            100.0
        } else {
            (elapsed_ms as f64 * 100.0 / duration_ms as f64).min(100.0)
        };
        Self {
            task_id,
            elapsed_ms,
            duration_ms,
            percent,
        }
    }

    pub fn remaining_ms(&self) -> u64 {
        self.duration_ms.saturating_sub(self.elapsed_ms)
    }

    /// Countdown as `MM:SS`.
    pub fn remaining(&self) -> String {
        format_mm_ss(self.remaining_ms())
    }

    /// Rotation of the pie slice, 360° at 100%.
    pub fn degrees(&self) -> f64 {
        360.0 / 100.0 * self.percent
    }

    /// A pie past the half needs the second (filled) half drawn as well.
    pub fn past_half(&self) -> bool {
        self.percent > 50.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POMODORO_MS: u64 = 45 * 60 * 1000;

    #[test]
    fn quarter_of_a_pomodoro() {
        let p = Progress::new(1, POMODORO_MS / 4, POMODORO_MS);
        assert_eq!(p.percent, 25.0);
        assert_eq!(p.degrees(), 90.0);
        assert!(!p.past_half());
        assert_eq!(p.remaining(), "33:45");
    }

    #[test]
    fn slice_switches_shape_after_half() {
        let half = Progress::new(1, POMODORO_MS / 2, POMODORO_MS);
        assert!(!half.past_half());
        let more = Progress::new(1, POMODORO_MS / 2 + 1000, POMODORO_MS);
        assert!(more.past_half());
    }
}
