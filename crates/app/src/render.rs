//! Plain-text views of the book.

use std::fmt::Write as _;

use medrem_medication::{MedicationEvent, MedicationRecord, Notice, Severity};
use medrem_reminders::ReminderBook;

const BAR_CELLS: usize = 10;

/// Stock gauge, e.g. `[######----] 60%`.
pub fn stock_bar(percent: u8) -> String {
    let filled = (usize::from(percent.min(100)) * BAR_CELLS + 50) / 100;
    format!(
        "[{}{}] {percent}%",
        "#".repeat(filled),
        "-".repeat(BAR_CELLS - filled)
    )
}

/// One medicine card. `number` is the 1-based list position.
pub fn card(number: usize, record: &MedicationRecord) -> String {
    let mut out = format!(
        "{number:>3}. {}  {}  {}  ({})  [{}]\n",
        record.name(),
        record.time(),
        record.dosage(),
        record.frequency().label(),
        record.status().as_str(),
    );

    let doses = record.doses_remaining();
    let _ = write!(
        out,
        "     Quantity: {} ({} {} left) {}",
        record.quantity(),
        doses,
        if doses == 1 { "dose" } else { "doses" },
        stock_bar(record.stock_percent()),
    );
    if record.is_low_stock() {
        out.push_str("  (Refill needed)");
    }
    out.push('\n');

    // Alert banners only accompany a reminder that can still be taken.
    if record.is_pending() {
        if record.is_low_stock() {
            let _ = writeln!(
                out,
                "     Low Inventory Alert: You only have {doses} {} of {} left. Consider refilling soon.",
                if doses == 1 { "dose" } else { "doses" },
                record.name(),
            );
        }
        if record.is_insufficient() {
            let _ = writeln!(
                out,
                "     Insufficient Quantity: You don't have enough {} for a complete dose ({}). Please refill immediately.",
                record.name(),
                record.dosage(),
            );
        }
    }
    if !record.instructions().is_empty() {
        let _ = writeln!(out, "     Note: {}", record.instructions());
    }
    let _ = writeln!(out, "     id: {}", record.id_typed());
    out
}

/// Summary line, low-stock banner, then cards grouped by status.
pub fn list(book: &ReminderBook) -> String {
    let summary = book.summary();
    let mut out = format!(
        "{} reminders: {} pending, {} taken, {} missed\n",
        summary.total, summary.pending, summary.taken, summary.missed
    );

    if book.is_empty() {
        out.push_str("No reminders yet. Use `add` to create one.\n");
        return out;
    }

    if let Some(banner) = book.low_stock_banner() {
        let _ = writeln!(out, "\n{}", notice(&banner));
    }

    let records = book.records();
    let number = |r: &MedicationRecord| {
        records
            .iter()
            .position(|x| x.id_typed() == r.id_typed())
            .map_or(0, |i| i + 1)
    };

    let groups = book.grouped();
    for (heading, group) in [
        ("Pending", &groups.pending),
        ("Taken", &groups.taken),
        ("Missed", &groups.missed),
    ] {
        if group.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{heading}");
        for &record in group {
            out.push_str(&card(number(record), record));
        }
    }
    out
}

pub fn notice(notice: &Notice) -> String {
    let marker = match notice.severity {
        Severity::Info => "*",
        Severity::Warning => "!",
    };
    format!("{marker} {}: {}", notice.title, notice.body)
}

/// Lines for every event that carries a notice.
pub fn events(events: &[MedicationEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(MedicationEvent::notice)
        .map(|n| notice(&n))
        .collect()
}
