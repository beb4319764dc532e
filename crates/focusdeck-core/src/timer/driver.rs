//! Async tick loop around a [`TimerCore`].
//!
//! Commands and ticks are multiplexed on one task, so a skip and a natural
//! completion can never race: whichever arrives first runs to the end before
//! the other is looked at.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

use super::clock::Clock;
use super::date::{DateKeySource, DateWatcher};
use super::engine::TimerCore;
use super::hooks::TimerHooks;
use super::settings::TimerSettings;

/// Operations a host can send to a running driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerCommand {
    Start,
    Pause,
    Reset { switch_to_work: bool },
    Skip,
    UpdateSettings(TimerSettings),
    DayChanged(String),
    Shutdown,
}

#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    pub tick_period: Duration,
    pub date_poll_period: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
            date_poll_period: Duration::from_secs(30),
        }
    }
}

pub struct TimerDriver<H: TimerHooks, C: Clock, S: DateKeySource> {
    core: TimerCore<H, C>,
    commands: mpsc::Receiver<TimerCommand>,
    watcher: Option<DateWatcher<S>>,
    config: DriverConfig,
}

impl<H: TimerHooks, C: Clock, S: DateKeySource> TimerDriver<H, C, S> {
    pub fn new(core: TimerCore<H, C>, commands: mpsc::Receiver<TimerCommand>) -> Self {
        Self {
            core,
            commands,
            watcher: None,
            config: DriverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DriverConfig) -> Self {
        self.config = config;
        self
    }

    /// Poll `watcher` periodically and roll the core over on day changes.
    pub fn with_date_watcher(mut self, watcher: DateWatcher<S>) -> Self {
        self.watcher = Some(watcher);
        self
    }

    /// Run until `Shutdown` is received or every sender is dropped, then hand
    /// the core back.
    pub async fn run(self) -> TimerCore<H, C> {
        let Self {
            mut core,
            mut commands,
            mut watcher,
            config,
        } = self;

        let mut ticker = interval(config.tick_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut date_poll = interval(config.date_poll_period);
        date_poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else {
                        tracing::debug!("command channel closed");
                        break;
                    };
                    if command == TimerCommand::Shutdown {
                        break;
                    }
                    let was_running = core.is_running();
                    apply(&mut core, command);
                    if core.is_running() && !was_running {
                        // Re-arm so the first tick lands one period after the start.
                        ticker.reset();
                    }
                }
                _ = ticker.tick(), if core.is_running() => {
                    core.tick();
                }
                _ = date_poll.tick(), if watcher.is_some() => {
                    if let Some(key) = watcher.as_mut().and_then(DateWatcher::poll) {
                        core.notify_day_changed(&key);
                    }
                }
            }
        }

        tracing::debug!(mode = %core.mode(), time_left = core.time_left(), "timer driver stopped");
        core
    }
}

fn apply<H: TimerHooks, C: Clock>(core: &mut TimerCore<H, C>, command: TimerCommand) {
    match command {
        TimerCommand::Start => core.start_timer(),
        TimerCommand::Pause => core.pause_timer(),
        TimerCommand::Reset { switch_to_work } => core.reset_timer(switch_to_work),
        TimerCommand::Skip => core.skip_timer(),
        TimerCommand::UpdateSettings(settings) => core.update_settings(settings),
        TimerCommand::DayChanged(key) => {
            core.set_date_key(&key);
        }
        TimerCommand::Shutdown => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventRecorder, TimerEvent};
    use crate::timer::{LocalDateSource, TimerMode};
    use std::sync::{Arc, Mutex};

    /// Clock that follows tokio's (pausable) time.
    #[derive(Clone)]
    struct TokioClock {
        origin: tokio::time::Instant,
    }

    impl TokioClock {
        fn new() -> Self {
            Self {
                origin: tokio::time::Instant::now(),
            }
        }
    }

    impl Clock for TokioClock {
        fn now_ms(&self) -> u64 {
            1_760_000_000_000 + self.origin.elapsed().as_millis() as u64
        }
    }

    fn core() -> TimerCore<EventRecorder, TokioClock> {
        TimerCore::new(TimerSettings::default(), "2026-10-15", EventRecorder::default())
            .with_clock(TokioClock::new())
    }

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[tokio::test(start_paused = true)]
    async fn runs_work_interval_to_completion() {
        let (tx, rx) = mpsc::channel(8);
        let driver: TimerDriver<_, _, LocalDateSource> = TimerDriver::new(core(), rx);
        let script = async move {
            tx.send(TimerCommand::Start).await.unwrap();
            tokio::time::sleep(secs(1500.5)).await;
            tx.send(TimerCommand::Shutdown).await.unwrap();
        };
        let (core, ()) = tokio::join!(driver.run(), script);

        assert_eq!(core.mode(), TimerMode::ShortBreak);
        assert!(!core.is_running());
        assert_eq!(core.session_log().len(), 1);
        assert!(core.session_log().records()[0].completed);
        assert_eq!(core.session_log().records()[0].duration_minutes, 25);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_stops_ticking() {
        let (tx, rx) = mpsc::channel(8);
        let driver: TimerDriver<_, _, LocalDateSource> = TimerDriver::new(core(), rx);
        let script = async move {
            tx.send(TimerCommand::Start).await.unwrap();
            tokio::time::sleep(secs(10.5)).await;
            tx.send(TimerCommand::Pause).await.unwrap();
            tokio::time::sleep(secs(100.0)).await;
            tx.send(TimerCommand::Shutdown).await.unwrap();
        };
        let (core, ()) = tokio::join!(driver.run(), script);

        assert_eq!(core.time_left(), 1490);
        assert_eq!(
            core.hooks().events(),
            &[
                TimerEvent::Started { mode: TimerMode::Work },
                TimerEvent::Paused { mode: TimerMode::Work },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn skip_command_logs_partial_interval() {
        let (tx, rx) = mpsc::channel(8);
        let driver: TimerDriver<_, _, LocalDateSource> = TimerDriver::new(core(), rx);
        let script = async move {
            tx.send(TimerCommand::Start).await.unwrap();
            tokio::time::sleep(secs(120.5)).await;
            tx.send(TimerCommand::Skip).await.unwrap();
            drop(tx);
        };
        let (core, ()) = tokio::join!(driver.run(), script);

        let record = &core.session_log().records()[0];
        assert!(!record.completed);
        assert_eq!(record.duration_minutes, 2);
        assert_eq!(core.mode(), TimerMode::ShortBreak);
    }

    #[tokio::test(start_paused = true)]
    async fn date_watcher_rolls_over() {
        let day = Arc::new(Mutex::new("2026-10-15".to_string()));
        let source = {
            let day = day.clone();
            move || day.lock().unwrap().clone()
        };
        let (tx, rx) = mpsc::channel(8);
        let driver = TimerDriver::new(core(), rx)
            .with_date_watcher(DateWatcher::new(source))
            .with_config(DriverConfig {
                tick_period: Duration::from_secs(1),
                date_poll_period: Duration::from_secs(30),
            });
        let script = async move {
            tx.send(TimerCommand::Skip).await.unwrap();
            tx.send(TimerCommand::Start).await.unwrap();
            tokio::time::sleep(secs(40.0)).await;
            *day.lock().unwrap() = "2026-10-16".into();
            tokio::time::sleep(secs(31.0)).await;
            tx.send(TimerCommand::Shutdown).await.unwrap();
        };
        let (core, ()) = tokio::join!(driver.run(), script);

        assert!(core.session_log().is_empty());
        assert_eq!(core.mode(), TimerMode::Work);
        assert!(!core.is_running());
        assert_eq!(core.date_key(), "2026-10-16");
    }

    #[tokio::test(start_paused = true)]
    async fn settings_update_through_channel() {
        let (tx, rx) = mpsc::channel(8);
        let driver: TimerDriver<_, _, LocalDateSource> = TimerDriver::new(core(), rx);
        let script = async move {
            let settings = TimerSettings {
                work_minutes: 50,
                ..TimerSettings::default()
            };
            tx.send(TimerCommand::UpdateSettings(settings)).await.unwrap();
            tx.send(TimerCommand::DayChanged("2026-10-15".into())).await.unwrap();
            tx.send(TimerCommand::Shutdown).await.unwrap();
        };
        let (core, ()) = tokio::join!(driver.run(), script);

        assert_eq!(core.time_left(), 3000);
        // Same day key: no rollover, no reset event.
        assert!(core.hooks().events().is_empty());
    }
}
