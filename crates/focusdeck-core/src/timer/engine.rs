//! Session timer core.
//!
//! A wall-clock-driven work/break state machine. It does not own a thread or
//! a timer: the caller (usually [`TimerDriver`](super::TimerDriver)) calls
//! `tick()` roughly once per second while the timer runs, and every tick
//! measures the real time elapsed since the previous one.
//!
//! ## Transitions
//!
//! ```text
//! work --(cycle % interval != 0)--> shortBreak --> work
//! work --(cycle % interval == 0)--> longBreak  --> work (cycle = 0)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = TimerCore::new(settings, "2026-10-15", hooks);
//! timer.start_timer();
//! // Once per second:
//! timer.tick();
//! ```

use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock};
use super::hooks::{NotificationPermission, Notifier, NullNotifier, TimerHooks, Translator};
use super::mode::TimerMode;
use super::session::{round_div, SessionLog, SessionRecord};
use super::settings::TimerSettings;
use crate::i18n::{keys, Catalog};

/// Serializable copy of the core's state, used to park a timer between
/// process runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub time_left: u64,
    pub is_running: bool,
    pub current_cycle_pomodoros: u32,
    pub session_log: SessionLog,
    pub date_key: String,
    #[serde(default)]
    pub last_tick_ms: Option<u64>,
    /// Settings the snapshot was taken under. Older snapshots without them
    /// load with the defaults.
    #[serde(default)]
    pub settings: TimerSettings,
}

/// Pomodoro session timer.
///
/// `long_break_interval` in the settings must be non-zero; it is used as a
/// modulus when a work interval ends.
pub struct TimerCore<H: TimerHooks = (), C: Clock = SystemClock> {
    settings: TimerSettings,
    mode: TimerMode,
    /// Seconds remaining in the current interval.
    time_left: u64,
    is_running: bool,
    current_cycle_pomodoros: u32,
    session_log: SessionLog,
    date_key: String,
    /// Wall-clock instant of the previous tick; `None` while stopped.
    last_tick_ms: Option<u64>,
    hooks: H,
    clock: C,
    notifier: Box<dyn Notifier>,
    translator: Box<dyn Translator>,
}

impl<H: TimerHooks> TimerCore<H, SystemClock> {
    /// Create a stopped timer at the start of a work interval.
    pub fn new(settings: TimerSettings, date_key: impl Into<String>, hooks: H) -> Self {
        let time_left = settings.duration_secs(TimerMode::Work);
        Self {
            settings,
            mode: TimerMode::Work,
            time_left,
            is_running: false,
            current_cycle_pomodoros: 0,
            session_log: SessionLog::new(),
            date_key: date_key.into(),
            last_tick_ms: None,
            hooks,
            clock: SystemClock,
            notifier: Box::new(NullNotifier),
            translator: Box::new(Catalog::english()),
        }
    }
}

impl<H: TimerHooks, C: Clock> TimerCore<H, C> {
    /// Swap the time source.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> TimerCore<H, C2> {
        TimerCore {
            settings: self.settings,
            mode: self.mode,
            time_left: self.time_left,
            is_running: self.is_running,
            current_cycle_pomodoros: self.current_cycle_pomodoros,
            session_log: self.session_log,
            date_key: self.date_key,
            last_tick_ms: self.is_running.then(|| clock.now_ms()),
            hooks: self.hooks,
            clock,
            notifier: self.notifier,
            translator: self.translator,
        }
    }

    /// Install the notification sink. Permission is requested right away
    /// when notifications are enabled and the sink has never been asked.
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self.ensure_notification_permission();
        self
    }

    pub fn with_translator(mut self, translator: impl Translator + 'static) -> Self {
        self.translator = Box::new(translator);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn time_left(&self) -> u64 {
        self.time_left
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn current_cycle_pomodoros(&self) -> u32 {
        self.current_cycle_pomodoros
    }

    /// Work intervals per cycle, i.e. how many pomodoros precede a long break.
    pub fn pomodoros_in_cycle(&self) -> u32 {
        self.settings.long_break_interval
    }

    pub fn session_log(&self) -> &SessionLog {
        &self.session_log
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn date_key(&self) -> &str {
        &self.date_key
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            time_left: self.time_left,
            is_running: self.is_running,
            current_cycle_pomodoros: self.current_cycle_pomodoros,
            session_log: self.session_log.clone(),
            date_key: self.date_key.clone(),
            last_tick_ms: self.last_tick_ms,
            settings: self.settings.clone(),
        }
    }

    /// Load a previously taken snapshot, settings included. No hooks fire.
    ///
    /// A running snapshot keeps its tick reference, so the next `tick()`
    /// catches up on the time spent parked. Follow with `update_settings`
    /// to apply settings that changed while the timer was parked.
    pub fn restore(&mut self, snapshot: TimerSnapshot) {
        self.settings = snapshot.settings;
        self.mode = snapshot.mode;
        self.time_left = snapshot.time_left;
        self.is_running = snapshot.is_running;
        self.current_cycle_pomodoros = snapshot.current_cycle_pomodoros;
        self.session_log = snapshot.session_log;
        self.date_key = snapshot.date_key;
        self.last_tick_ms = match (snapshot.is_running, snapshot.last_tick_ms) {
            (false, _) => None,
            (true, Some(ms)) => Some(ms),
            (true, None) => Some(self.clock.now_ms()),
        };
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start_timer(&mut self) {
        if self.is_running {
            return;
        }
        self.is_running = true;
        self.last_tick_ms = Some(self.clock.now_ms());
        tracing::debug!(mode = %self.mode, time_left = self.time_left, "timer started");
        self.hooks.on_timer_start(self.mode);
    }

    /// Stop the countdown. Calling it on a stopped timer changes nothing.
    pub fn pause_timer(&mut self) {
        if !self.is_running {
            return;
        }
        self.is_running = false;
        self.last_tick_ms = None;
        tracing::debug!(mode = %self.mode, time_left = self.time_left, "timer paused");
        self.hooks.on_timer_pause(self.mode);
    }

    /// Stop and refill the current interval. With `switch_to_work` the timer
    /// also returns to work and starts a new cycle.
    pub fn reset_timer(&mut self, switch_to_work: bool) {
        self.is_running = false;
        self.last_tick_ms = None;
        if switch_to_work {
            self.mode = TimerMode::Work;
            self.current_cycle_pomodoros = 0;
        }
        self.time_left = self.settings.duration_secs(self.mode);
        tracing::debug!(mode = %self.mode, switch_to_work, "timer reset");
        self.hooks.on_timer_reset(self.mode);
    }

    /// End the current interval early. Only the elapsed part is logged and
    /// the record is marked not completed.
    pub fn skip_timer(&mut self) {
        let previous = self.mode;
        self.last_tick_ms = None;
        let next = self.transition(true);
        tracing::debug!(from = %previous, to = %next, "timer skipped");
        self.hooks.on_timer_skip(previous, next);
    }

    /// Advance the countdown by the wall-clock time since the previous tick.
    ///
    /// Does nothing while stopped. When the countdown reaches zero the tick
    /// loop stops and the interval completes.
    pub fn tick(&mut self) {
        if !self.is_running {
            return;
        }
        let now = self.clock.now_ms();
        let last = self.last_tick_ms.unwrap_or(now);
        let elapsed = round_div(now.saturating_sub(last), 1000);
        self.last_tick_ms = Some(now);
        self.time_left = self.time_left.saturating_sub(elapsed);
        self.hooks.on_tick(self.time_left, self.mode);

        if self.time_left == 0 {
            self.is_running = false;
            self.last_tick_ms = None;
            self.transition(false);
        }
    }

    /// Apply new settings. A stopped timer picks up changed durations
    /// immediately; a running countdown is left alone.
    pub fn update_settings(&mut self, settings: TimerSettings) {
        let durations_changed = self.settings.durations_differ(&settings);
        let notifications_turned_on =
            settings.notifications_enabled && !self.settings.notifications_enabled;
        self.settings = settings;

        if durations_changed && !self.is_running {
            self.time_left = self.settings.duration_secs(self.mode);
        }
        if notifications_turned_on {
            self.ensure_notification_permission();
        }
    }

    /// Roll over to `date_key` if it differs from the current day.
    ///
    /// Returns whether a rollover happened. Passing the key the timer was
    /// created with is a no-op.
    pub fn set_date_key(&mut self, date_key: &str) -> bool {
        if self.date_key == date_key {
            return false;
        }
        self.notify_day_changed(date_key);
        true
    }

    /// Start a new day: clear the log, restart the cycle, and reset to a
    /// stopped work interval. An in-progress interval is discarded.
    pub fn notify_day_changed(&mut self, date_key: &str) {
        tracing::info!(
            from = %self.date_key,
            to = %date_key,
            dropped_sessions = self.session_log.len(),
            "day rollover"
        );
        self.date_key = date_key.to_string();
        self.session_log.clear();
        self.current_cycle_pomodoros = 0;
        self.reset_timer(true);
        self.hooks.on_day_changed(date_key);
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Log the ended interval and move to the next mode. Returns the new mode.
    fn transition(&mut self, skipped: bool) -> TimerMode {
        let ended = self.mode;
        let configured = self.settings.duration_secs(ended);
        let elapsed = if skipped {
            configured.saturating_sub(self.time_left)
        } else {
            configured
        };
        let now = self.clock.now_ms();
        self.session_log
            .push(SessionRecord::new(ended, elapsed, now, !skipped));

        let next = match ended {
            TimerMode::Work => {
                self.current_cycle_pomodoros += 1;
                if self.current_cycle_pomodoros % self.settings.long_break_interval == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                }
            }
            TimerMode::ShortBreak => TimerMode::Work,
            TimerMode::LongBreak => {
                self.current_cycle_pomodoros = 0;
                TimerMode::Work
            }
        };
        self.time_left = self.settings.duration_secs(next);
        self.mode = next;

        tracing::info!(
            ended = %ended,
            next = %next,
            completed = !skipped,
            elapsed_secs = elapsed,
            cycle = self.current_cycle_pomodoros,
            "interval ended"
        );
        self.hooks
            .on_interval_end(ended, self.current_cycle_pomodoros, &self.session_log);
        self.notify_interval_end(ended, next);

        let auto_start = match ended {
            TimerMode::Work => self.settings.auto_start_breaks,
            TimerMode::ShortBreak | TimerMode::LongBreak => self.settings.auto_start_pomodoros,
        };
        self.is_running = auto_start;
        self.last_tick_ms = auto_start.then_some(now);
        next
    }

    fn notify_interval_end(&mut self, ended: TimerMode, next: TimerMode) {
        if !self.settings.notifications_enabled
            || self.notifier.permission() != NotificationPermission::Granted
        {
            return;
        }
        let title_key = if ended.is_break() {
            keys::BREAK_ENDED_TITLE
        } else {
            keys::WORK_ENDED_TITLE
        };
        let body_key = match next {
            TimerMode::Work => keys::NEXT_WORK,
            TimerMode::ShortBreak => keys::NEXT_SHORT_BREAK,
            TimerMode::LongBreak => keys::NEXT_LONG_BREAK,
        };
        let minutes = self.settings.minutes_for(next).to_string();
        let title = self.translator.translate(title_key, &[]);
        let body = self.translator.translate(body_key, &[("minutes", minutes)]);
        self.notifier.notify(&title, &body);
    }

    fn ensure_notification_permission(&mut self) {
        if self.settings.notifications_enabled
            && self.notifier.permission() == NotificationPermission::Default
        {
            let granted = self.notifier.request_permission();
            tracing::debug!(?granted, "notification permission requested");
        }
    }
}

impl<H: TimerHooks + std::fmt::Debug, C: Clock> std::fmt::Debug for TimerCore<H, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerCore")
            .field("mode", &self.mode)
            .field("time_left", &self.time_left)
            .field("is_running", &self.is_running)
            .field("current_cycle_pomodoros", &self.current_cycle_pomodoros)
            .field("sessions", &self.session_log.len())
            .field("date_key", &self.date_key)
            .field("hooks", &self.hooks)
            .finish()
    }
}
