//! The medication inventory engine.

use std::sync::Arc;

use chrono::NaiveTime;
use serde::Serialize;

use medrem_core::{DomainResult, MedicationId};
use medrem_events::{Event, execute};
use medrem_medication::{
    LowStockRule, MarkMissed, MarkTaken, MedicationCommand, MedicationDeleted, MedicationEvent,
    MedicationRecord, NewMedication, Notice, Register, ReminderStatus, SetQuantity,
    low_stock_banner,
};
use medrem_notify::Notifier;

use crate::config::EngineConfig;

/// Status a user can move a pending reminder to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusChange {
    Taken,
    Missed,
}

/// Records split by status, each group in insertion order.
#[derive(Debug, Default)]
pub struct StatusGroups<'a> {
    pub pending: Vec<&'a MedicationRecord>,
    pub taken: Vec<&'a MedicationRecord>,
    pub missed: Vec<&'a MedicationRecord>,
}

/// Header counts.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub pending: usize,
    pub taken: usize,
    pub missed: usize,
}

/// Pending records whose doses remaining are at or below the refill threshold
/// expressed in doses.
pub fn compute_low_stock_set(records: &[MedicationRecord]) -> Vec<&MedicationRecord> {
    low_stock_by(records, LowStockRule::Doses)
}

fn low_stock_by(records: &[MedicationRecord], rule: LowStockRule) -> Vec<&MedicationRecord> {
    records
        .iter()
        .filter(|r| r.is_pending())
        .filter(|r| rule.is_low(r.quantity(), r.refill_threshold(), r.dose_amount()))
        .collect()
}

/// Owns the ordered record collection and every transition on it.
///
/// Each mutating operation returns the events it produced and hands their
/// notices to the notifier. Unknown ids are ignored.
pub struct ReminderBook {
    records: Vec<MedicationRecord>,
    notifier: Arc<dyn Notifier>,
    config: EngineConfig,
}

impl core::fmt::Debug for ReminderBook {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReminderBook")
            .field("records", &self.records)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReminderBook {
    pub fn new(notifier: Arc<dyn Notifier>, config: EngineConfig) -> Self {
        Self {
            records: Vec::new(),
            notifier,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn records(&self) -> &[MedicationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: MedicationId) -> Option<&MedicationRecord> {
        self.records.iter().find(|r| r.id_typed() == id)
    }

    /// Register a new medication at the end of the list.
    ///
    /// The input is taken as given; required-field checks belong to the form.
    /// A rejected registration leaves the book untouched.
    pub fn add(&mut self, input: NewMedication) -> DomainResult<MedicationRecord> {
        let id = MedicationId::new();
        let mut record = MedicationRecord::empty(id);
        let cmd = MedicationCommand::Register(Register { id, medication: input });

        let events = execute(&mut record, &cmd).inspect_err(|e| {
            tracing::error!(error = %e, medication_id = %id, "registration rejected");
        })?;

        tracing::info!(
            medication_id = %id,
            name = record.name(),
            time = %record.time(),
            quantity = record.quantity(),
            "medication added"
        );
        self.records.push(record.clone());
        self.dispatch(&events);
        Ok(record)
    }

    pub fn delete(&mut self, id: MedicationId) -> Vec<MedicationEvent> {
        let Some(pos) = self.position(id) else {
            tracing::debug!(medication_id = %id, "delete ignored: unknown id");
            return Vec::new();
        };
        let record = self.records.remove(pos);
        tracing::info!(medication_id = %id, name = record.name(), "medication deleted");

        let events = vec![MedicationEvent::Deleted(MedicationDeleted {
            id,
            name: record.name().to_string(),
        })];
        self.dispatch(&events);
        events
    }

    pub fn change_status(&mut self, id: MedicationId, status: StatusChange) -> Vec<MedicationEvent> {
        let cmd = match status {
            StatusChange::Taken => MedicationCommand::MarkTaken(MarkTaken {
                id,
                policy: self.config.insufficient_stock,
            }),
            StatusChange::Missed => MedicationCommand::MarkMissed(MarkMissed { id }),
        };
        self.run(id, &cmd)
    }

    pub fn change_quantity(&mut self, id: MedicationId, quantity: u32) -> Vec<MedicationEvent> {
        self.run(id, &MedicationCommand::SetQuantity(SetQuantity { id, quantity }))
    }

    /// Add one dose worth of stock.
    pub fn restock_dose(&mut self, id: MedicationId) -> Vec<MedicationEvent> {
        let Some(record) = self.get(id) else {
            return Vec::new();
        };
        let quantity = record.quantity().saturating_add(record.dose_amount());
        self.change_quantity(id, quantity)
    }

    /// Remove one dose worth of stock; nothing happens when less than a dose is left.
    pub fn remove_dose(&mut self, id: MedicationId) -> Vec<MedicationEvent> {
        let Some(record) = self.get(id) else {
            return Vec::new();
        };
        if record.is_insufficient() {
            return Vec::new();
        }
        let quantity = record.quantity() - record.dose_amount();
        self.change_quantity(id, quantity)
    }

    /// Periodic scan: remind about every pending record that is due at `now`.
    ///
    /// Reads state only; a reminder that goes unanswered stays pending.
    pub fn tick(&self, now: NaiveTime) -> Vec<MedicationEvent> {
        let events: Vec<MedicationEvent> = self
            .records
            .iter()
            .filter_map(|r| r.reminder_due(now, self.config.reminder_window_minutes))
            .collect();
        tracing::debug!(now = %now.format("%H:%M"), due = events.len(), "reminder scan");
        self.dispatch(&events);
        events
    }

    /// Low-stock set under the configured banner rule.
    pub fn low_stock(&self) -> Vec<&MedicationRecord> {
        low_stock_by(&self.records, self.config.low_stock_rule)
    }

    pub fn low_stock_banner(&self) -> Option<Notice> {
        low_stock_banner(self.low_stock().into_iter().map(MedicationRecord::name))
    }

    pub fn grouped(&self) -> StatusGroups<'_> {
        let mut groups = StatusGroups::default();
        for record in &self.records {
            match record.status() {
                ReminderStatus::Pending => groups.pending.push(record),
                ReminderStatus::Taken => groups.taken.push(record),
                ReminderStatus::Missed => groups.missed.push(record),
            }
        }
        groups
    }

    pub fn summary(&self) -> Summary {
        let groups = self.grouped();
        Summary {
            total: self.records.len(),
            pending: groups.pending.len(),
            taken: groups.taken.len(),
            missed: groups.missed.len(),
        }
    }

    fn position(&self, id: MedicationId) -> Option<usize> {
        self.records.iter().position(|r| r.id_typed() == id)
    }

    fn run(&mut self, id: MedicationId, cmd: &MedicationCommand) -> Vec<MedicationEvent> {
        let Some(record) = self.records.iter_mut().find(|r| r.id_typed() == id) else {
            tracing::debug!(medication_id = %id, "command ignored: unknown id");
            return Vec::new();
        };

        match execute(record, cmd) {
            Ok(events) => {
                self.dispatch(&events);
                events
            }
            Err(e) => {
                tracing::warn!(error = %e, medication_id = %id, "command rejected");
                Vec::new()
            }
        }
    }

    fn dispatch(&self, events: &[MedicationEvent]) {
        for event in events {
            if event.is_alert() {
                tracing::info!(
                    event_type = event.event_type(),
                    medication_id = %event.medication_id(),
                    "alert raised"
                );
            }
            if let Some(notice) = event.notice() {
                let shown = self.notifier.send(&notice.title, &notice.body);
                tracing::debug!(event_type = event.event_type(), shown, "notice dispatched");
            }
        }
    }
}
