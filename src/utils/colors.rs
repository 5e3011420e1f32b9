/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Counter color: grey while zero, the given color otherwise.
pub fn color_for_count(value: i64, active: &'static str) -> &'static str {
    if value > 0 { active } else { GREY }
}
