//! Calendar-day keys and rollover detection.

use chrono::{Local, NaiveDate};

/// Format used for day keys, e.g. `2026-10-15`.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Today's key in the local time zone.
pub fn today_key() -> String {
    date_key(Local::now().date_naive())
}

/// Where the current day key comes from.
pub trait DateKeySource {
    fn current_key(&self) -> String;
}

/// Local calendar day.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDateSource;

impl DateKeySource for LocalDateSource {
    fn current_key(&self) -> String {
        today_key()
    }
}

impl<F> DateKeySource for F
where
    F: Fn() -> String,
{
    fn current_key(&self) -> String {
        self()
    }
}

/// Polls a [`DateKeySource`] and reports genuine day changes.
///
/// The key seen at construction is the baseline, so the first poll on the
/// same day reports nothing.
#[derive(Debug)]
pub struct DateWatcher<S: DateKeySource> {
    source: S,
    last: String,
}

impl<S: DateKeySource> DateWatcher<S> {
    pub fn new(source: S) -> Self {
        let last = source.current_key();
        Self { source, last }
    }

    /// Start from a known key instead of reading the source.
    pub fn starting_at(source: S, key: impl Into<String>) -> Self {
        Self {
            source,
            last: key.into(),
        }
    }

    pub fn last_key(&self) -> &str {
        &self.last
    }

    /// Returns the new key when the day changed since the previous poll.
    pub fn poll(&mut self) -> Option<String> {
        let key = self.source.current_key();
        if key == self.last {
            return None;
        }
        self.last = key.clone();
        Some(key)
    }
}
