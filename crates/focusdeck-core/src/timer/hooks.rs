//! Collaborator contracts consumed by the timer core.
//!
//! The hook set is fixed, so the core is generic over a [`TimerHooks`]
//! implementation instead of holding a list of boxed listeners.

use super::mode::TimerMode;
use super::session::SessionLog;

/// Lifecycle observer. Every method defaults to a no-op.
pub trait TimerHooks {
    fn on_timer_start(&mut self, _mode: TimerMode) {}

    fn on_timer_pause(&mut self, _mode: TimerMode) {}

    fn on_timer_reset(&mut self, _mode: TimerMode) {}

    fn on_timer_skip(&mut self, _previous: TimerMode, _next: TimerMode) {}

    /// Hand-off point for persistence and summary triggering.
    ///
    /// `log` already contains the record for `ended`.
    fn on_interval_end(&mut self, _ended: TimerMode, _cycle_pomodoros: u32, _log: &SessionLog) {}

    /// Fires on every tick while running. Display only.
    fn on_tick(&mut self, _time_left: u64, _mode: TimerMode) {}

    /// The day rolled over; the log is already empty and the timer reset.
    fn on_day_changed(&mut self, _date_key: &str) {}
}

impl TimerHooks for () {}

/// OS notification permission, as reported by the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPermission {
    /// Never asked.
    Default,
    Granted,
    Denied,
}

/// Capability to show OS-level notifications.
pub trait Notifier {
    fn permission(&self) -> NotificationPermission;

    /// Ask for permission. Only called while the permission is `Default`.
    fn request_permission(&mut self) -> NotificationPermission;

    /// Fire-and-forget; failures are the sink's concern.
    fn notify(&mut self, title: &str, body: &str);
}

/// Sink that never shows anything and never gets permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn permission(&self) -> NotificationPermission {
        NotificationPermission::Denied
    }

    fn request_permission(&mut self) -> NotificationPermission {
        NotificationPermission::Denied
    }

    fn notify(&mut self, _title: &str, _body: &str) {}
}

/// Opaque `(key, params) -> text` lookup used for notification copy.
pub trait Translator {
    fn translate(&self, key: &str, params: &[(&str, String)]) -> String;
}

impl<F> Translator for F
where
    F: Fn(&str, &[(&str, String)]) -> String,
{
    fn translate(&self, key: &str, params: &[(&str, String)]) -> String {
        self(key, params)
    }
}
