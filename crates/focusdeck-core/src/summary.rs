//! When the host should ask for an AI summary of the day so far.

use crate::timer::{SessionLog, TimerMode};

/// Decide from an `on_interval_end` hand-off whether to request a summary.
///
/// A summary is due when a long break is about to start, or when the ended
/// short break is the `long_break_interval`-th (2×, 3×, ...) of the day.
pub fn should_request_summary(
    ended: TimerMode,
    cycle_pomodoros: u32,
    log: &SessionLog,
    long_break_interval: u32,
) -> bool {
    if long_break_interval == 0 {
        return false;
    }
    match ended {
        TimerMode::Work => cycle_pomodoros > 0 && cycle_pomodoros % long_break_interval == 0,
        TimerMode::ShortBreak => {
            let short_breaks = log.count_mode(TimerMode::ShortBreak) as u32;
            short_breaks > 0 && short_breaks % long_break_interval == 0
        }
        TimerMode::LongBreak => false,
    }
}
