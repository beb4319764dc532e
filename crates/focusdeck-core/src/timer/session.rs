//! Session records and the per-day session log.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::mode::TimerMode;

const MS_PER_MINUTE: u64 = 60_000;

/// One ended interval, whether it ran out or was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    /// Epoch milliseconds; always `end_time - duration_minutes * 60_000`.
    pub start_time: u64,
    /// Epoch milliseconds.
    pub end_time: u64,
    pub mode: TimerMode,
    pub duration_minutes: u64,
    pub completed: bool,
}

impl SessionRecord {
    /// Build a record for an interval of `elapsed_secs` that ended at `end_time`.
    ///
    /// The duration is rounded to the nearest minute (half rounds up) and the
    /// start time is derived from the rounded value.
    pub fn new(mode: TimerMode, elapsed_secs: u64, end_time: u64, completed: bool) -> Self {
        let duration_minutes = round_div(elapsed_secs, 60);
        Self {
            id: Uuid::new_v4().to_string(),
            start_time: end_time.saturating_sub(duration_minutes.saturating_mul(MS_PER_MINUTE)),
            end_time,
            mode,
            duration_minutes,
            completed,
        }
    }
}

/// Integer division rounding half away from zero.
pub(crate) fn round_div(n: u64, d: u64) -> u64 {
    n.saturating_add(d / 2) / d
}

/// Ordered log of the intervals ended during the current day.
///
/// Only the timer core appends to or clears the log; everyone else gets a
/// shared view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionLog {
    records: Vec<SessionRecord>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<SessionRecord>) -> Self {
        Self { records }
    }

    pub(crate) fn push(&mut self, record: SessionRecord) {
        self.records.push(record);
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SessionRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&SessionRecord> {
        self.records.last()
    }

    pub fn count_mode(&self, mode: TimerMode) -> usize {
        self.records.iter().filter(|r| r.mode == mode).count()
    }
}

impl<'a> IntoIterator for &'a SessionLog {
    type Item = &'a SessionRecord;
    type IntoIter = std::slice::Iter<'a, SessionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
