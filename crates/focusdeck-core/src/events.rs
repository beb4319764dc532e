use serde::{Deserialize, Serialize};

use crate::timer::{SessionLog, TimerHooks, TimerMode};

/// Every observable timer side effect, as a value.
/// The CLI prints these; tests assert on their order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    Started {
        mode: TimerMode,
    },
    Paused {
        mode: TimerMode,
    },
    Reset {
        mode: TimerMode,
    },
    Skipped {
        from: TimerMode,
        to: TimerMode,
    },
    IntervalEnded {
        ended: TimerMode,
        cycle_pomodoros: u32,
        /// Length of the session log handed to the hook.
        log_len: usize,
    },
    Tick {
        time_left: u64,
        mode: TimerMode,
    },
    DayChanged {
        date_key: String,
    },
}

/// [`TimerHooks`] implementation that buffers events for later draining.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Vec<TimerEvent>,
    include_ticks: bool,
}

impl EventRecorder {
    /// Also record per-second ticks.
    pub fn with_ticks() -> Self {
        Self {
            events: Vec::new(),
            include_ticks: true,
        }
    }

    pub fn events(&self) -> &[TimerEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<TimerEvent> {
        std::mem::take(&mut self.events)
    }
}

impl TimerHooks for EventRecorder {
    fn on_timer_start(&mut self, mode: TimerMode) {
        self.events.push(TimerEvent::Started { mode });
    }

    fn on_timer_pause(&mut self, mode: TimerMode) {
        self.events.push(TimerEvent::Paused { mode });
    }

    fn on_timer_reset(&mut self, mode: TimerMode) {
        self.events.push(TimerEvent::Reset { mode });
    }

    fn on_timer_skip(&mut self, previous: TimerMode, next: TimerMode) {
        self.events.push(TimerEvent::Skipped {
            from: previous,
            to: next,
        });
    }

    fn on_interval_end(&mut self, ended: TimerMode, cycle_pomodoros: u32, log: &SessionLog) {
        self.events.push(TimerEvent::IntervalEnded {
            ended,
            cycle_pomodoros,
            log_len: log.len(),
        });
    }

    fn on_tick(&mut self, time_left: u64, mode: TimerMode) {
        if self.include_ticks {
            self.events.push(TimerEvent::Tick { time_left, mode });
        }
    }

    fn on_day_changed(&mut self, date_key: &str) {
        self.events.push(TimerEvent::DayChanged {
            date_key: date_key.to_string(),
        });
    }
}
