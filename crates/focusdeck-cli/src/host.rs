//! Wiring between the timer core and the CLI's storage and terminal.

use std::io::Write;

use focusdeck_core::timer::{today_key, NullNotifier};
use focusdeck_core::{
    should_request_summary, Config, Database, EventRecorder, SessionLog, TimerCore, TimerEvent,
    TimerHooks, TimerMode, TimerSnapshot,
};
use serde::Serialize;

use crate::notify::DesktopNotifier;

const SNAPSHOT_KEY: &str = "timer_snapshot";

pub type CliTimer = TimerCore<CliHooks>;

/// Host side of the interval hand-off: persists the day's log, decides on
/// summaries, and optionally draws a live status line.
pub struct CliHooks {
    db: Database,
    user: String,
    date_key: String,
    long_break_interval: u32,
    live: bool,
    events: EventRecorder,
}

impl CliHooks {
    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn drain_events(&mut self) -> Vec<TimerEvent> {
        self.events.drain()
    }
}

impl TimerHooks for CliHooks {
    fn on_timer_start(&mut self, mode: TimerMode) {
        self.events.on_timer_start(mode);
    }

    fn on_timer_pause(&mut self, mode: TimerMode) {
        self.events.on_timer_pause(mode);
    }

    fn on_timer_reset(&mut self, mode: TimerMode) {
        self.events.on_timer_reset(mode);
    }

    fn on_timer_skip(&mut self, previous: TimerMode, next: TimerMode) {
        self.events.on_timer_skip(previous, next);
        if self.live {
            println!("\nskipped {} -> {}", previous.label(), next.label());
        }
    }

    fn on_interval_end(&mut self, ended: TimerMode, cycle_pomodoros: u32, log: &SessionLog) {
        self.events.on_interval_end(ended, cycle_pomodoros, log);
        if let Err(e) = self.db.save_day_log(&self.user, &self.date_key, log) {
            tracing::error!(error = %e, date_key = %self.date_key, "failed to persist session log");
        }
        if should_request_summary(ended, cycle_pomodoros, log, self.long_break_interval) {
            tracing::info!(
                ended = %ended,
                sessions = log.len(),
                "summary requested for {}",
                self.date_key
            );
        }
        if self.live {
            println!(
                "\n{} finished ({} pomodoros this cycle, {} sessions today)",
                ended.label(),
                cycle_pomodoros,
                log.len()
            );
        }
    }

    fn on_tick(&mut self, time_left: u64, mode: TimerMode) {
        if self.live {
            print!("\r{:<12} {}   ", mode.label(), format_remaining(time_left));
            let _ = std::io::stdout().flush();
        }
    }

    fn on_day_changed(&mut self, date_key: &str) {
        self.events.on_day_changed(date_key);
        self.date_key = date_key.to_string();
        if self.live {
            println!("\nnew day {date_key}: session log cleared");
        }
    }
}

/// Build the timer for today.
///
/// A parked snapshot is resumed (and rolled over if it belongs to an earlier
/// day). Without one, the timer starts fresh on top of today's stored log.
/// Config edits made while parked reach the timer through `update_settings`,
/// so a stopped interval is refilled with the new duration.
pub fn load_timer(
    config: &Config,
    live: bool,
    quiet: bool,
) -> Result<CliTimer, Box<dyn std::error::Error>> {
    let settings = config.timer_settings()?;
    let db = Database::open()?;
    let today = today_key();

    let parked = match db.kv_get(SNAPSHOT_KEY)? {
        Some(json) => match serde_json::from_str::<TimerSnapshot>(&json) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable timer snapshot");
                None
            }
        },
        None => None,
    };
    let start_key = parked
        .as_ref()
        .map(|s| s.date_key.clone())
        .unwrap_or_else(|| today.clone());
    let stored_log = if parked.is_none() {
        Some(db.load_day_log(&config.user, &today)?)
    } else {
        None
    };

    let hooks = CliHooks {
        db,
        user: config.user.clone(),
        date_key: start_key.clone(),
        long_break_interval: settings.long_break_interval,
        live,
        events: EventRecorder::default(),
    };
    let mut timer = TimerCore::new(settings.clone(), start_key, hooks);
    timer = if quiet {
        timer.with_notifier(NullNotifier)
    } else {
        timer.with_notifier(DesktopNotifier::new())
    };

    if let Some(snapshot) = parked {
        timer.restore(snapshot);
    } else if let Some(log) = stored_log {
        let mut snapshot = timer.snapshot();
        snapshot.session_log = log;
        timer.restore(snapshot);
    }
    timer.update_settings(settings);
    timer.set_date_key(&today);
    Ok(timer)
}

/// Store the timer so the next invocation can pick it up.
pub fn park(timer: &CliTimer) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(&timer.snapshot())?;
    timer.hooks().db().kv_set(SNAPSHOT_KEY, &json)?;
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct StatusView {
    pub mode: TimerMode,
    pub time_left: u64,
    pub remaining: String,
    pub is_running: bool,
    pub current_cycle_pomodoros: u32,
    pub pomodoros_in_cycle: u32,
    pub sessions_today: usize,
    pub date_key: String,
}

impl StatusView {
    pub fn of(timer: &CliTimer) -> Self {
        Self {
            mode: timer.mode(),
            time_left: timer.time_left(),
            remaining: format_remaining(timer.time_left()),
            is_running: timer.is_running(),
            current_cycle_pomodoros: timer.current_cycle_pomodoros(),
            pomodoros_in_cycle: timer.pomodoros_in_cycle(),
            sessions_today: timer.session_log().len(),
            date_key: timer.date_key().to_string(),
        }
    }
}

/// `mm:ss`, with minutes growing past 59 for long intervals.
pub fn format_remaining(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
