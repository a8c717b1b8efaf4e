//! Periodic reminder scan on a background thread.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveTime};
use tracing::{debug, error, info};

use crate::book::ReminderBook;

/// Source of the wall-clock time of day.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveTime;
}

/// Local wall clock.
#[derive(Debug, Copy, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveTime>,
}

impl ManualClock {
    pub fn new(now: NaiveTime) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: NaiveTime) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveTime {
        self.now.lock().map(|t| *t).unwrap_or(NaiveTime::MIN)
    }
}

/// Handle to a running scheduler.
///
/// The scan thread lives exactly as long as this handle: `shutdown()` or
/// dropping it stops the loop and joins the thread.
#[derive(Debug)]
pub struct SchedulerHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
    ticks: Arc<AtomicU64>,
}

impl SchedulerHandle {
    /// Stop the scan and wait for the thread to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    /// Number of scans completed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.join.as_ref().is_some_and(|j| !j.is_finished())
    }

    fn stop(&mut self) {
        let _ = self.shutdown.send(());
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                error!("reminder scheduler thread panicked");
            }
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Drives [`ReminderBook::tick`] on a fixed interval.
pub struct ReminderScheduler;

impl ReminderScheduler {
    /// Spawn the scan loop. The first scan runs one `poll_interval` after start.
    pub fn spawn(
        book: Arc<Mutex<ReminderBook>>,
        clock: Arc<dyn Clock>,
        poll_interval: Duration,
    ) -> std::io::Result<SchedulerHandle> {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let ticks = Arc::new(AtomicU64::new(0));
        let ticks_clone = ticks.clone();

        let join = thread::Builder::new()
            .name("reminder-scheduler".to_string())
            .spawn(move || {
                scan_loop(&book, clock.as_ref(), poll_interval, &shutdown_rx, &ticks_clone);
            })?;

        Ok(SchedulerHandle {
            shutdown: shutdown_tx,
            join: Some(join),
            ticks,
        })
    }
}

fn scan_loop(
    book: &Mutex<ReminderBook>,
    clock: &dyn Clock,
    poll_interval: Duration,
    shutdown_rx: &mpsc::Receiver<()>,
    ticks: &AtomicU64,
) {
    info!(interval_secs = poll_interval.as_secs_f64(), "reminder scheduler started");

    loop {
        match shutdown_rx.recv_timeout(poll_interval) {
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }

        let now = clock.now();
        match book.lock() {
            Ok(book) => {
                let due = book.tick(now);
                debug!(due = due.len(), "scheduled scan finished");
            }
            Err(_) => {
                error!("reminder book lock poisoned; stopping scheduler");
                break;
            }
        }
        ticks.fetch_add(1, Ordering::Relaxed);
    }

    info!("reminder scheduler stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use medrem_medication::{Frequency, NewMedication, ReminderTime};
    use medrem_notify::MemoryNotifier;

    use crate::config::EngineConfig;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn wait_until(timeout: Duration, mut done: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if done() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        done()
    }

    fn shared_book() -> (Arc<Mutex<ReminderBook>>, Arc<MemoryNotifier>) {
        let notifier = Arc::new(MemoryNotifier::new());
        let mut book = ReminderBook::new(notifier.clone(), EngineConfig::default());
        book.add(NewMedication {
            name: "Aspirin".to_string(),
            time: ReminderTime::from_hm(8, 0).unwrap(),
            dosage: "2 pills".to_string(),
            instructions: String::new(),
            frequency: Frequency::Daily,
            quantity: 10,
            refill_threshold: 4,
        })
        .unwrap();
        notifier.clear();
        (Arc::new(Mutex::new(book)), notifier)
    }

    #[test]
    fn scans_on_interval_and_stops_on_shutdown() {
        let (book, notifier) = shared_book();
        let clock = Arc::new(ManualClock::new(at(8, 0)));
        let handle =
            ReminderScheduler::spawn(book.clone(), clock.clone(), Duration::from_millis(10)).unwrap();

        assert!(wait_until(Duration::from_secs(2), || !notifier.delivered().is_empty()));
        assert_eq!(notifier.titles()[0], "Time to take Aspirin");
        assert!(handle.ticks() >= 1);
        assert!(handle.is_running());

        handle.shutdown();

        // Nothing fires once the thread is gone, even at a due time.
        notifier.clear();
        clock.set(at(8, 0));
        thread::sleep(Duration::from_millis(50));
        assert!(notifier.delivered().is_empty());
    }

    #[test]
    fn outside_window_nothing_is_sent() {
        let (book, notifier) = shared_book();
        let clock = Arc::new(ManualClock::new(at(12, 0)));
        let handle = ReminderScheduler::spawn(book, clock, Duration::from_millis(5)).unwrap();

        assert!(wait_until(Duration::from_secs(2), || handle.ticks() >= 3));
        assert!(notifier.delivered().is_empty());
    }

    #[test]
    fn dropping_the_handle_joins_the_thread() {
        let (book, _) = shared_book();
        let clock = Arc::new(ManualClock::new(at(12, 0)));
        let handle = ReminderScheduler::spawn(book.clone(), clock, Duration::from_secs(3600)).unwrap();
        let started = Instant::now();
        drop(handle);
        // The hour-long wait is interrupted rather than sat out.
        assert!(started.elapsed() < Duration::from_secs(5));
        // Only the test holds the book now.
        assert_eq!(Arc::strong_count(&book), 1);
    }

    #[test]
    fn scan_never_changes_status() {
        let (book, _) = shared_book();
        let clock = Arc::new(ManualClock::new(at(8, 0)));
        let handle = ReminderScheduler::spawn(book.clone(), clock, Duration::from_millis(5)).unwrap();
        assert!(wait_until(Duration::from_secs(2), || handle.ticks() >= 2));
        handle.shutdown();

        let guard = book.lock().unwrap();
        assert!(guard.records().iter().all(|r| r.is_pending()));
    }
}
