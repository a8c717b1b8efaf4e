//! Command execution against a shared book.

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, anyhow};

use medrem_core::MedicationId;
use medrem_medication::MedicationEvent;
use medrem_notify::{GatedNotifier, LogBackend};
use medrem_reminders::{Clock, ReminderBook, StatusChange};

use crate::command::{HELP, ShellCommand, Target, resolve};
use crate::render;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Quit,
}

/// Everything a shell command can touch. The book is shared with the scheduler.
pub struct Session {
    book: Arc<Mutex<ReminderBook>>,
    notifier: Arc<GatedNotifier<LogBackend>>,
    clock: Arc<dyn Clock>,
}

impl Session {
    pub fn new(
        book: Arc<Mutex<ReminderBook>>,
        notifier: Arc<GatedNotifier<LogBackend>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            book,
            notifier,
            clock,
        }
    }

    pub fn book(&self) -> &Arc<Mutex<ReminderBook>> {
        &self.book
    }

    pub fn execute(&self, cmd: ShellCommand) -> anyhow::Result<Reply> {
        let text = match cmd {
            ShellCommand::Quit => return Ok(Reply::Quit),
            ShellCommand::Help => HELP.to_string(),
            ShellCommand::Permission => {
                let outcome = self.notifier.request_permission();
                format!("{}: {}", outcome.title(), outcome.description())
            }
            ShellCommand::Add(form) => {
                let input = form.submit().context("cannot add reminder")?;
                let mut book = self.lock()?;
                let record = book.add(input).context("registration rejected")?;
                format!("Added\n{}", render::card(book.len(), &record))
            }
            ShellCommand::Take(target) => {
                self.on_target(target, |book, id| book.change_status(id, StatusChange::Taken))?
            }
            ShellCommand::Miss(target) => {
                self.on_target(target, |book, id| book.change_status(id, StatusChange::Missed))?
            }
            ShellCommand::Quantity(target, quantity) => {
                self.on_target(target, |book, id| book.change_quantity(id, quantity))?
            }
            ShellCommand::Restock(target) => {
                self.on_target(target, |book, id| book.restock_dose(id))?
            }
            ShellCommand::Remove(target) => {
                self.on_target(target, |book, id| book.remove_dose(id))?
            }
            ShellCommand::Delete(target) => self.on_target(target, |book, id| book.delete(id))?,
            ShellCommand::List => render::list(&*self.lock()?),
            ShellCommand::Json => serde_json::to_string_pretty(self.lock()?.records())
                .context("cannot serialize records")?,
            ShellCommand::Tick(at) => {
                let now = at.unwrap_or_else(|| self.clock.now());
                let events = self.lock()?.tick(now);
                if events.is_empty() {
                    format!("No reminders due at {}", now.format("%H:%M"))
                } else {
                    render::events(&events).join("\n")
                }
            }
        };
        Ok(Reply::Output(text))
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, ReminderBook>> {
        self.book
            .lock()
            .map_err(|_| anyhow!("reminder book lock poisoned"))
    }

    fn on_target<F>(&self, target: Target, op: F) -> anyhow::Result<String>
    where
        F: FnOnce(&mut ReminderBook, MedicationId) -> Vec<MedicationEvent>,
    {
        let mut book = self.lock()?;
        let ids: Vec<MedicationId> = book.records().iter().map(|r| r.id_typed()).collect();
        let id = resolve(target, &ids).ok_or_else(|| match target {
            Target::Index(i) => anyhow!("no reminder #{}", i + 1),
            Target::Id(id) => anyhow!("no reminder with id {id}"),
        })?;

        let events = op(&mut *book, id);
        let lines = render::events(&events);
        Ok(if lines.is_empty() {
            "Updated".to_string()
        } else {
            lines.join("\n")
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use medrem_notify::Permission;
    use medrem_reminders::{EngineConfig, ManualClock};

    use super::*;
    use crate::command::parse_line;

    fn session(permission: Permission) -> Session {
        let notifier = Arc::new(GatedNotifier::new(LogBackend::default(), permission));
        let book = ReminderBook::new(notifier.clone(), EngineConfig::default());
        let clock = Arc::new(ManualClock::new(NaiveTime::from_hms_opt(8, 0, 0).unwrap()));
        Session::new(Arc::new(Mutex::new(book)), notifier, clock)
    }

    fn run(s: &Session, line: &str) -> anyhow::Result<String> {
        match s.execute(parse_line(line)?)? {
            Reply::Output(text) => Ok(text),
            Reply::Quit => Ok("<quit>".to_string()),
        }
    }

    #[test]
    fn add_take_and_list() {
        let s = session(Permission::Granted);
        let added = run(&s, r#"add name=Aspirin time=08:00 dosage="2 pills" quantity=10 threshold=4"#)
            .unwrap();
        assert!(added.contains("  1. Aspirin"));

        let taken = run(&s, "take 1").unwrap();
        assert!(taken.contains("Aspirin Taken"));
        assert_eq!(s.book().lock().unwrap().records()[0].quantity(), 8);

        let listed = run(&s, "list").unwrap();
        assert!(listed.contains("1 taken"));
    }

    #[test]
    fn list_reads_through_the_shared_lock() {
        let s = session(Permission::Granted);
        run(&s, "add name=Zinc time=09:00 dosage=1").unwrap();
        let listed = run(&s, "list").unwrap();
        assert!(listed.starts_with("1 reminders: 1 pending"));
        // The guard is released once the command returns.
        assert!(s.book().try_lock().is_ok());
    }

    #[test]
    fn quantity_change_reports_alert() {
        let s = session(Permission::Granted);
        run(&s, "add name=Zinc time=09:00 dosage=1 quantity=20 threshold=5").unwrap();
        let out = run(&s, "qty 1 0").unwrap();
        assert!(out.contains("Zinc Depleted"));
    }

    #[test]
    fn unknown_reference_is_an_error() {
        let s = session(Permission::Granted);
        let err = run(&s, "take 3").unwrap_err();
        assert!(err.to_string().contains("no reminder #3"));
    }

    #[test]
    fn invalid_form_is_an_error_and_adds_nothing() {
        let s = session(Permission::Granted);
        assert!(run(&s, "add name=Aspirin dosage=1").is_err());
        assert!(s.book().lock().unwrap().is_empty());
    }

    #[test]
    fn tick_uses_clock_or_explicit_time() {
        let s = session(Permission::Denied);
        run(&s, "add name=Aspirin time=08:00 dosage=2").unwrap();
        assert!(run(&s, "tick").unwrap().contains("Time to take Aspirin"));
        assert_eq!(run(&s, "tick 12:00").unwrap(), "No reminders due at 12:00");
    }

    #[test]
    fn json_dumps_records() {
        let s = session(Permission::Granted);
        run(&s, "add name=Aspirin time=08:00 dosage=2").unwrap();
        let out = run(&s, "json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["name"], "Aspirin");
        assert_eq!(value[0]["status"], "pending");
    }

    #[test]
    fn permission_request_enables_delivery() {
        let s = session(Permission::Default);
        let out = run(&s, "permission").unwrap();
        assert!(out.starts_with("Notifications enabled"));
    }

    #[test]
    fn delete_then_quit() {
        let s = session(Permission::Granted);
        run(&s, "add name=Aspirin time=08:00 dosage=2").unwrap();
        assert!(run(&s, "delete 1").unwrap().contains("Reminder deleted"));
        assert!(s.book().lock().unwrap().is_empty());
        assert_eq!(s.execute(ShellCommand::Quit).unwrap(), Reply::Quit);
    }
}
