use chrono::{DateTime, Local, NaiveDate};
use clap::Subcommand;
use focusdeck_core::timer::{date_key, today_key, DATE_KEY_FORMAT};
use focusdeck_core::{Config, Database, SessionRecord};

#[derive(Subcommand)]
pub enum LogAction {
    /// Show one day's session log
    Show {
        /// Day as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
        /// Print the raw JSON log
        #[arg(long)]
        json: bool,
    },
    /// List days with a stored log
    Days,
    /// Per-mode totals for one day
    Stats {
        /// Day as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
}

fn resolve_date(date: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    match date {
        None => Ok(today_key()),
        Some(raw) => {
            let parsed = NaiveDate::parse_from_str(&raw, DATE_KEY_FORMAT)
                .map_err(|e| format!("invalid date '{raw}': {e}"))?;
            Ok(date_key(parsed))
        }
    }
}

fn clock_time(epoch_ms: u64) -> String {
    DateTime::from_timestamp_millis(epoch_ms as i64)
        .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".into())
}

fn describe(record: &SessionRecord) -> String {
    format!(
        "{}-{}  {:<12} {:>4} min  {}",
        clock_time(record.start_time),
        clock_time(record.end_time),
        record.mode.label(),
        record.duration_minutes,
        if record.completed { "completed" } else { "skipped" }
    )
}

pub fn run(action: LogAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;

    match action {
        LogAction::Show { date, json } => {
            let day = resolve_date(date)?;
            let log = db.load_day_log(&config.user, &day)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&log)?);
            } else if log.is_empty() {
                println!("no sessions on {day}");
            } else {
                for record in &log {
                    println!("{}", describe(record));
                }
            }
        }
        LogAction::Days => {
            for day in db.list_days(&config.user)? {
                println!("{day}");
            }
        }
        LogAction::Stats { date } => {
            let day = resolve_date(date)?;
            let stats = db.day_stats(&config.user, &day)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
