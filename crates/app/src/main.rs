use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};

use anyhow::Context;

use medrem_app::{AppConfig, Reply, Session, parse_line};
use medrem_notify::{GatedNotifier, LogBackend, Permission};
use medrem_reminders::{ReminderBook, ReminderScheduler, SystemClock};

fn main() -> anyhow::Result<()> {
    medrem_observability::init().context("invalid logging configuration")?;

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!(
        window_minutes = config.engine.reminder_window_minutes,
        poll_secs = config.engine.poll_interval.as_secs(),
        notifications = config.notifications.as_str(),
        "starting medicine reminders"
    );

    let notifier = Arc::new(GatedNotifier::new(
        LogBackend::new(Permission::Granted),
        config.notifications,
    ));
    let book = Arc::new(Mutex::new(ReminderBook::new(
        notifier.clone(),
        config.engine.clone(),
    )));
    let clock = Arc::new(SystemClock);

    let scheduler = ReminderScheduler::spawn(book.clone(), clock.clone(), config.engine.poll_interval)
        .context("failed to start reminder scheduler")?;

    let session = Session::new(book, notifier, clock);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    writeln!(stdout, "Medicine reminders. Type `help` for commands.")?;
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let cmd = match parse_line(&line) {
            Ok(cmd) => cmd,
            Err(e) => {
                writeln!(stdout, "error: {e}")?;
                continue;
            }
        };

        match session.execute(cmd) {
            Ok(Reply::Output(text)) => writeln!(stdout, "{text}")?,
            Ok(Reply::Quit) => break,
            Err(e) => writeln!(stdout, "error: {e:#}")?,
        }
    }

    scheduler.shutdown();
    tracing::info!("bye");
    Ok(())
}
