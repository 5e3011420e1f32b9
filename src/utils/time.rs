//! Time utilities: countdown formatting and minute/millisecond conversions.

pub const MILLIS_PER_SECOND: u64 = 1000;
pub const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;

/// Format a number of milliseconds as `MM:SS`.
///
/// Partial seconds round up so the display never shows `00:00`
/// while time is still left.
pub fn format_mm_ss(millis: u64) -> String {
    let secs = millis.div_ceil(MILLIS_PER_SECOND);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Saturates at `u64::MAX` instead of overflowing.
pub fn minutes_to_millis(minutes: u64) -> u64 {
    minutes.saturating_mul(MILLIS_PER_MINUTE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_pomodoro() {
        assert_eq!(format_mm_ss(minutes_to_millis(45)), "45:00");
        assert_eq!(format_mm_ss(minutes_to_millis(44)), "44:00");
        assert_eq!(format_mm_ss(0), "00:00");
    }

    #[test]
    fn huge_minute_counts_saturate() {
        assert_eq!(minutes_to_millis(u64::MAX), u64::MAX);
        assert_eq!(minutes_to_millis(u64::MAX / MILLIS_PER_MINUTE + 1), u64::MAX);
    }

    #[test]
    fn partial_seconds_round_up() {
        assert_eq!(format_mm_ss(59_001), "01:00");
        assert_eq!(format_mm_ss(1), "00:01");
    }
}
