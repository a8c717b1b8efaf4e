use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::NaiveTime;
use medrem_app::{Reply, Session, parse_line};
use medrem_notify::{GatedNotifier, LogBackend, Permission};
use medrem_reminders::{
    EngineConfig, ManualClock, ReminderBook, ReminderScheduler, SchedulerHandle,
};

struct TestShell {
    session: Session,
    scheduler: Option<SchedulerHandle>,
}

impl TestShell {
    /// Same wiring as the binary, with a manual clock and a fast scan.
    fn spawn(now: NaiveTime) -> Self {
        let notifier = Arc::new(GatedNotifier::new(LogBackend::default(), Permission::Granted));
        let book = Arc::new(Mutex::new(ReminderBook::new(
            notifier.clone(),
            EngineConfig::default(),
        )));
        let clock = Arc::new(ManualClock::new(now));
        let scheduler =
            ReminderScheduler::spawn(book.clone(), clock.clone(), Duration::from_millis(5))
                .expect("spawn scheduler");
        Self {
            session: Session::new(book, notifier, clock),
            scheduler: Some(scheduler),
        }
    }

    fn run(&self, line: &str) -> String {
        match self.session.execute(parse_line(line).expect("parse")) {
            Ok(Reply::Output(text)) => text,
            Ok(Reply::Quit) => "<quit>".to_string(),
            Err(e) => format!("error: {e:#}"),
        }
    }

    fn quantities(&self) -> Vec<u32> {
        let book = self.session.book().lock().unwrap();
        book.records().iter().map(|r| r.quantity()).collect()
    }
}

impl Drop for TestShell {
    fn drop(&mut self) {
        if let Some(handle) = self.scheduler.take() {
            handle.shutdown();
        }
    }
}

#[test]
fn scripted_session() {
    let shell = TestShell::spawn(NaiveTime::from_hms_opt(12, 0, 0).unwrap());

    shell.run(r#"add name=Aspirin time=08:00 dosage="2 pills" quantity=10 threshold=4"#);
    shell.run("add name=Zinc time=20:00 dosage=1 frequency=weekly");
    assert_eq!(shell.quantities(), vec![10, 15]);

    let out = shell.run("take 1");
    assert!(out.contains("Aspirin Taken"), "{out}");
    shell.run("take 1");
    let out = shell.run("take 1");
    assert!(out.contains("Aspirin - Running Low"), "{out}");
    assert_eq!(shell.quantities(), vec![4, 15]);

    shell.run("restock 1");
    shell.run("remove 2");
    assert_eq!(shell.quantities(), vec![6, 14]);

    shell.run("miss 2");
    let listed = shell.run("list");
    assert!(listed.starts_with("2 reminders: 0 pending, 1 taken, 1 missed"), "{listed}");
    assert!(listed.contains("(Weekly)"));

    let out = shell.run("take 9");
    assert!(out.starts_with("error: no reminder #9"), "{out}");

    assert_eq!(shell.run("quit"), "<quit>");
}

#[test]
fn background_scan_leaves_state_alone() {
    let shell = TestShell::spawn(NaiveTime::from_hms_opt(8, 0, 0).unwrap());
    shell.run("add name=Aspirin time=08:00 dosage=2 quantity=10 threshold=2");

    let deadline = Instant::now() + Duration::from_secs(2);
    while shell.scheduler.as_ref().map_or(0, |h| h.ticks()) < 3 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(shell.scheduler.as_ref().unwrap().ticks() >= 3);

    let json = shell.run("json");
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[0]["status"], "pending");
    assert_eq!(value[0]["quantity"], 10);
}
