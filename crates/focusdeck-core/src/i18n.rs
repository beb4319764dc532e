//! Built-in notification copy.

use std::collections::HashMap;

use crate::timer::Translator;

/// Translation keys the timer core looks up.
pub mod keys {
    pub const WORK_ENDED_TITLE: &str = "notifications.workEnded.title";
    pub const BREAK_ENDED_TITLE: &str = "notifications.breakEnded.title";
    pub const NEXT_WORK: &str = "notifications.next.work";
    pub const NEXT_SHORT_BREAK: &str = "notifications.next.shortBreak";
    pub const NEXT_LONG_BREAK: &str = "notifications.next.longBreak";
}

/// Key → template table with `{name}` placeholders.
///
/// Unknown keys translate to the key itself.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn english() -> Self {
        let mut catalog = Self::default();
        catalog.insert(keys::WORK_ENDED_TITLE, "Work session complete");
        catalog.insert(keys::BREAK_ENDED_TITLE, "Break is over");
        catalog.insert(keys::NEXT_WORK, "Time to focus for {minutes} minutes.");
        catalog.insert(keys::NEXT_SHORT_BREAK, "Time for a {minutes}-minute short break.");
        catalog.insert(keys::NEXT_LONG_BREAK, "Time for a {minutes}-minute long break.");
        catalog
    }

    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.entries.insert(key.into(), template.into());
    }
}

impl Translator for Catalog {
    fn translate(&self, key: &str, params: &[(&str, String)]) -> String {
        let Some(template) = self.entries.get(key) else {
            return key.to_string();
        };
        params
            .iter()
            .fold(template.clone(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }
}
