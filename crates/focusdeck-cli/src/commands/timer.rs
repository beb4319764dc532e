use clap::Subcommand;
use focusdeck_core::timer::{DateWatcher, LocalDateSource, TimerCommand, TimerDriver};
use focusdeck_core::Config;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::host::{self, CliTimer, StatusView};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer in the foreground (s=start p=pause r=reset w=reset to work k=skip q=quit)
    Run {
        /// Start counting immediately
        #[arg(long)]
        start: bool,
        /// Do not show desktop notifications
        #[arg(long)]
        quiet: bool,
    },
    /// Start or resume the current interval
    Start,
    /// Pause the current interval
    Pause,
    /// End the current interval early
    Skip,
    /// Stop and refill the current interval
    Reset {
        /// Also return to a work interval and start a new cycle
        #[arg(long)]
        work: bool,
    },
    /// Print current timer state as JSON
    Status,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    if let TimerAction::Run { start, quiet } = action {
        let timer = host::load_timer(&config, true, quiet)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let timer = runtime.block_on(run_foreground(timer, start));
        host::park(&timer)?;
        println!();
        println!("{}", serde_json::to_string_pretty(&StatusView::of(&timer))?);
        return Ok(());
    }

    // One-shot commands never show notifications: an interval that ran out
    // while parked is only noticed here, after the fact.
    let mut timer = host::load_timer(&config, false, true)?;
    // Catch up on the time spent parked.
    timer.tick();

    match action {
        TimerAction::Start => timer.start_timer(),
        TimerAction::Pause => timer.pause_timer(),
        TimerAction::Skip => timer.skip_timer(),
        TimerAction::Reset { work } => timer.reset_timer(work),
        TimerAction::Status | TimerAction::Run { .. } => {}
    }

    for event in timer.hooks_mut().drain_events() {
        println!("{}", serde_json::to_string(&event)?);
    }
    println!("{}", serde_json::to_string_pretty(&StatusView::of(&timer))?);

    host::park(&timer)?;
    Ok(())
}

async fn run_foreground(timer: CliTimer, start: bool) -> CliTimer {
    let (tx, rx) = mpsc::channel(16);
    let watcher = DateWatcher::starting_at(LocalDateSource, timer.date_key());
    let driver = TimerDriver::new(timer, rx).with_date_watcher(watcher);

    let input = async move {
        if start && tx.send(TimerCommand::Start).await.is_err() {
            return;
        }
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    break;
                }
            };
            let command = match line.trim() {
                "" => continue,
                "s" | "start" => TimerCommand::Start,
                "p" | "pause" => TimerCommand::Pause,
                "r" | "reset" => TimerCommand::Reset { switch_to_work: false },
                "w" | "work" => TimerCommand::Reset { switch_to_work: true },
                "k" | "skip" => TimerCommand::Skip,
                "q" | "quit" => break,
                other => {
                    eprintln!("unknown command: {other}");
                    continue;
                }
            };
            if tx.send(command).await.is_err() {
                return;
            }
        }
        let _ = tx.send(TimerCommand::Shutdown).await;
    };

    let (timer, ()) = tokio::join!(driver.run(), input);
    timer
}
