//! # focusdeck Core Library
//!
//! Core business logic for the focusdeck Pomodoro timer. The CLI host in
//! `focusdeck-cli` is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer Core**: A wall-clock-based work/break state machine that keeps
//!   the day's session log and reports interval boundaries through hooks
//! - **Timer Driver**: A tokio loop that ticks the core once per second and
//!   serializes host commands with ticks
//! - **Storage**: TOML configuration and a SQLite store with one session log
//!   per user and day
//!
//! ## Key Components
//!
//! - [`TimerCore`]: Core timer state machine
//! - [`TimerDriver`]: Async tick loop
//! - [`TimerHooks`]: Observer interface for interval boundaries
//! - [`Database`]: Per-day session log persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod i18n;
pub mod storage;
pub mod summary;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::{EventRecorder, TimerEvent};
pub use i18n::Catalog;
pub use storage::{Config, Database, DayStats};
pub use summary::should_request_summary;
pub use timer::{
    Clock, DateWatcher, ManualClock, NotificationPermission, Notifier, SessionLog, SessionRecord,
    SystemClock, TimerCommand, TimerCore, TimerDriver, TimerHooks, TimerMode, TimerSettings,
    TimerSnapshot, Translator,
};
