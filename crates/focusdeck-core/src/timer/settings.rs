use serde::{Deserialize, Serialize};

use super::mode::TimerMode;

/// Durations and behavior flags the timer core reads but never mutates.
///
/// The core treats every value as already validated: minute values are
/// opaque non-negative integers, and `long_break_interval` must be at least 1
/// (it is used as a modulus). Hosts build these through
/// [`Config::timer_settings`](crate::Config::timer_settings), which enforces
/// both rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    /// Completed work intervals before a long break is inserted.
    pub long_break_interval: u32,
    pub auto_start_breaks: bool,
    pub auto_start_pomodoros: bool,
    pub notifications_enabled: bool,
}

impl TimerSettings {
    pub fn minutes_for(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Work => self.work_minutes,
            TimerMode::ShortBreak => self.short_break_minutes,
            TimerMode::LongBreak => self.long_break_minutes,
        }
    }

    /// Configured length of `mode` in seconds.
    pub fn duration_secs(&self, mode: TimerMode) -> u64 {
        u64::from(self.minutes_for(mode)).saturating_mul(60)
    }

    /// True when any of the three interval lengths differ.
    pub fn durations_differ(&self, other: &TimerSettings) -> bool {
        self.work_minutes != other.work_minutes
            || self.short_break_minutes != other.short_break_minutes
            || self.long_break_minutes != other.long_break_minutes
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_interval: 4,
            auto_start_breaks: false,
            auto_start_pomodoros: false,
            notifications_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_secs_per_mode() {
        let s = TimerSettings::default();
        assert_eq!(s.duration_secs(TimerMode::Work), 1500);
        assert_eq!(s.duration_secs(TimerMode::ShortBreak), 300);
        assert_eq!(s.duration_secs(TimerMode::LongBreak), 900);
    }

    #[test]
    fn durations_differ_ignores_flags() {
        let a = TimerSettings::default();
        let mut b = a.clone();
        b.auto_start_breaks = true;
        b.notifications_enabled = false;
        assert!(!a.durations_differ(&b));
        b.long_break_minutes = 20;
        assert!(a.durations_differ(&b));
    }
}
