mod clock;
mod date;
mod driver;
mod engine;
mod hooks;
mod mode;
mod session;
mod settings;

pub use clock::{Clock, ManualClock, SystemClock};
pub use date::{date_key, today_key, DateKeySource, DateWatcher, LocalDateSource, DATE_KEY_FORMAT};
pub use driver::{DriverConfig, TimerCommand, TimerDriver};
pub use engine::{TimerCore, TimerSnapshot};
pub use hooks::{NotificationPermission, Notifier, NullNotifier, TimerHooks, Translator};
pub use mode::TimerMode;
pub use session::{SessionLog, SessionRecord};
pub use settings::TimerSettings;
