use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use medrem_core::{Aggregate, AggregateRoot, DomainError, MedicationId};
use medrem_events::{Command, Event};

use crate::dosage::{derive_dose_amount, derive_doses_remaining};
use crate::intake::NewMedication;
use crate::schedule::{Frequency, ReminderTime};
use crate::stock::{self, StockLevel};

/// Where a reminder is in its cycle.
///
/// `Pending` is the only non-terminal state; nothing moves a record back to it.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    #[default]
    Pending,
    Taken,
    Missed,
}

impl ReminderStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Taken => "taken",
            Self::Missed => "missed",
        }
    }
}

/// What to do when a dose is marked taken but the stock cannot cover it.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsufficientStockPolicy {
    /// Leave the quantity alone, raise an alert, and still record the dose as taken.
    #[default]
    MarkTaken,
    /// Leave the quantity alone, raise an alert, and keep the reminder pending.
    Refuse,
}

impl InsufficientStockPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "mark-taken" => Some(Self::MarkTaken),
            "refuse" => Some(Self::Refuse),
            _ => None,
        }
    }
}

/// Aggregate root: one medication and its reminder/inventory state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MedicationRecord {
    id: MedicationId,
    name: String,
    time: ReminderTime,
    dosage: String,
    instructions: String,
    frequency: Frequency,
    status: ReminderStatus,
    quantity: u32,
    refill_threshold: u32,
    #[serde(skip)]
    version: u64,
    #[serde(skip)]
    created: bool,
}

impl MedicationRecord {
    /// Create an empty, not-yet-registered record.
    pub fn empty(id: MedicationId) -> Self {
        Self {
            id,
            name: String::new(),
            time: ReminderTime::default(),
            dosage: String::new(),
            instructions: String::new(),
            frequency: Frequency::default(),
            status: ReminderStatus::Pending,
            quantity: 0,
            refill_threshold: 0,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> MedicationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn time(&self) -> ReminderTime {
        self.time
    }

    pub fn dosage(&self) -> &str {
        &self.dosage
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn status(&self) -> ReminderStatus {
        self.status
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn refill_threshold(&self) -> u32 {
        self.refill_threshold
    }

    pub fn is_pending(&self) -> bool {
        self.status == ReminderStatus::Pending
    }

    pub fn dose_amount(&self) -> u32 {
        derive_dose_amount(&self.dosage)
    }

    pub fn doses_remaining(&self) -> u32 {
        derive_doses_remaining(self.quantity, self.dose_amount())
    }

    /// Per-record "refill needed" flag (quantity rule).
    pub fn is_low_stock(&self) -> bool {
        stock::at_or_below_threshold(self.quantity, self.refill_threshold)
    }

    /// Not enough left for one complete dose.
    pub fn is_insufficient(&self) -> bool {
        stock::insufficient_for_dose(self.quantity, self.dose_amount())
    }

    pub fn stock_percent(&self) -> u8 {
        stock::stock_percent(self.quantity, self.refill_threshold)
    }

    /// Reminder for a pending record whose time falls within the window.
    pub fn reminder_due(&self, now: NaiveTime, window_minutes: u32) -> Option<MedicationEvent> {
        if !self.is_pending() || !self.time.is_due(now, window_minutes) {
            return None;
        }
        Some(MedicationEvent::TimeToTake(TimeToTake {
            id: self.id,
            name: self.name.clone(),
            dosage: self.dosage.clone(),
            doses_remaining: self.doses_remaining(),
        }))
    }
}

impl AggregateRoot for MedicationRecord {
    type Id = MedicationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: Register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    pub id: MedicationId,
    pub medication: NewMedication,
}

/// Command: MarkTaken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkTaken {
    pub id: MedicationId,
    pub policy: InsufficientStockPolicy,
}

/// Command: MarkMissed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkMissed {
    pub id: MedicationId,
}

/// Command: SetQuantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetQuantity {
    pub id: MedicationId,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MedicationCommand {
    Register(Register),
    MarkTaken(MarkTaken),
    MarkMissed(MarkMissed),
    SetQuantity(SetQuantity),
}

impl Command for MedicationCommand {
    fn target_id(&self) -> MedicationId {
        match self {
            MedicationCommand::Register(c) => c.id,
            MedicationCommand::MarkTaken(c) => c.id,
            MedicationCommand::MarkMissed(c) => c.id,
            MedicationCommand::SetQuantity(c) => c.id,
        }
    }
}

/// Event: MedicationAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationAdded {
    pub id: MedicationId,
    pub medication: NewMedication,
}

/// Event: MedicationDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationDeleted {
    pub id: MedicationId,
    pub name: String,
}

/// Event: DoseTaken. `quantity_after` equals `quantity_before` when the stock
/// could not cover the dose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseTaken {
    pub id: MedicationId,
    pub name: String,
    pub dose_amount: u32,
    pub quantity_before: u32,
    pub quantity_after: u32,
}

/// Event: DoseMissed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseMissed {
    pub id: MedicationId,
    pub name: String,
}

/// Event: QuantitySet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantitySet {
    pub id: MedicationId,
    pub name: String,
    pub quantity: u32,
}

/// What caused a stock alert.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockTrigger {
    DoseTaken,
    Adjusted,
}

/// Alert: stock is at or below the refill threshold but not empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningLow {
    pub id: MedicationId,
    pub name: String,
    pub quantity: u32,
    pub doses_remaining: u32,
    pub trigger: StockTrigger,
}

/// Alert: the dose just taken used up the last of the stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutOfStock {
    pub id: MedicationId,
    pub name: String,
}

/// Alert: the quantity was set to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Depleted {
    pub id: MedicationId,
    pub name: String,
}

/// Alert: a dose was marked taken without enough stock to cover it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsufficientQuantity {
    pub id: MedicationId,
    pub name: String,
    pub quantity: u32,
    pub dose_amount: u32,
}

/// Alert: a pending reminder's time has come.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeToTake {
    pub id: MedicationId,
    pub name: String,
    pub dosage: String,
    pub doses_remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MedicationEvent {
    Added(MedicationAdded),
    Deleted(MedicationDeleted),
    DoseTaken(DoseTaken),
    DoseMissed(DoseMissed),
    QuantitySet(QuantitySet),
    RunningLow(RunningLow),
    OutOfStock(OutOfStock),
    Depleted(Depleted),
    InsufficientQuantity(InsufficientQuantity),
    TimeToTake(TimeToTake),
}

impl MedicationEvent {
    pub fn medication_id(&self) -> MedicationId {
        match self {
            MedicationEvent::Added(e) => e.id,
            MedicationEvent::Deleted(e) => e.id,
            MedicationEvent::DoseTaken(e) => e.id,
            MedicationEvent::DoseMissed(e) => e.id,
            MedicationEvent::QuantitySet(e) => e.id,
            MedicationEvent::RunningLow(e) => e.id,
            MedicationEvent::OutOfStock(e) => e.id,
            MedicationEvent::Depleted(e) => e.id,
            MedicationEvent::InsufficientQuantity(e) => e.id,
            MedicationEvent::TimeToTake(e) => e.id,
        }
    }
}

impl Event for MedicationEvent {
    fn event_type(&self) -> &'static str {
        match self {
            MedicationEvent::Added(_) => "medication.added",
            MedicationEvent::Deleted(_) => "medication.deleted",
            MedicationEvent::DoseTaken(_) => "medication.dose.taken",
            MedicationEvent::DoseMissed(_) => "medication.dose.missed",
            MedicationEvent::QuantitySet(_) => "medication.quantity.set",
            MedicationEvent::RunningLow(_) => "medication.stock.running_low",
            MedicationEvent::OutOfStock(_) => "medication.stock.out_of_stock",
            MedicationEvent::Depleted(_) => "medication.stock.depleted",
            MedicationEvent::InsufficientQuantity(_) => "medication.stock.insufficient",
            MedicationEvent::TimeToTake(_) => "medication.reminder.due",
        }
    }

    fn is_alert(&self) -> bool {
        matches!(
            self,
            MedicationEvent::RunningLow(_)
                | MedicationEvent::OutOfStock(_)
                | MedicationEvent::Depleted(_)
                | MedicationEvent::InsufficientQuantity(_)
                | MedicationEvent::TimeToTake(_)
        )
    }
}

impl Aggregate for MedicationRecord {
    type Command = MedicationCommand;
    type Event = MedicationEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            MedicationEvent::Added(e) => {
                let m = &e.medication;
                self.id = e.id;
                self.name = m.name.clone();
                self.time = m.time;
                self.dosage = m.dosage.clone();
                self.instructions = m.instructions.clone();
                self.frequency = m.frequency;
                self.quantity = m.quantity;
                self.refill_threshold = m.refill_threshold;
                self.status = ReminderStatus::Pending;
                self.created = true;
            }
            MedicationEvent::DoseTaken(e) => {
                self.quantity = e.quantity_after;
                self.status = ReminderStatus::Taken;
            }
            MedicationEvent::DoseMissed(_) => {
                self.status = ReminderStatus::Missed;
            }
            MedicationEvent::QuantitySet(e) => {
                self.quantity = e.quantity;
            }
            MedicationEvent::Deleted(_)
            | MedicationEvent::RunningLow(_)
            | MedicationEvent::OutOfStock(_)
            | MedicationEvent::Depleted(_)
            | MedicationEvent::InsufficientQuantity(_)
            | MedicationEvent::TimeToTake(_) => {}
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        let target = command.target_id();
        if target != self.id {
            return Err(DomainError::WrongRecord {
                record: self.id,
                command: target,
            });
        }
        match command {
            MedicationCommand::Register(cmd) => self.handle_register(cmd),
            MedicationCommand::MarkTaken(cmd) => self.handle_taken(cmd),
            MedicationCommand::MarkMissed(_) => self.handle_missed(),
            MedicationCommand::SetQuantity(cmd) => self.handle_set_quantity(cmd),
        }
    }
}

impl MedicationRecord {
    fn ensure_created(&self) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::NotRegistered);
        }
        Ok(())
    }

    fn handle_register(&self, cmd: &Register) -> Result<Vec<MedicationEvent>, DomainError> {
        if self.created {
            return Err(DomainError::AlreadyRegistered(self.id));
        }
        // Required fields are the form's contract; the engine takes input as given.
        Ok(vec![MedicationEvent::Added(MedicationAdded {
            id: cmd.id,
            medication: cmd.medication.clone(),
        })])
    }

    fn handle_taken(&self, cmd: &MarkTaken) -> Result<Vec<MedicationEvent>, DomainError> {
        self.ensure_created()?;

        let dose = self.dose_amount();
        if self.quantity < dose {
            let mut events = vec![MedicationEvent::InsufficientQuantity(InsufficientQuantity {
                id: self.id,
                name: self.name.clone(),
                quantity: self.quantity,
                dose_amount: dose,
            })];
            if cmd.policy == InsufficientStockPolicy::MarkTaken {
                events.push(self.dose_taken(dose, self.quantity));
            }
            return Ok(events);
        }

        let remaining = self.quantity - dose;
        let mut events = vec![self.dose_taken(dose, remaining)];
        match StockLevel::classify(remaining, self.refill_threshold) {
            StockLevel::Healthy => {}
            StockLevel::Low => events.push(self.running_low(remaining, StockTrigger::DoseTaken)),
            StockLevel::Empty => events.push(MedicationEvent::OutOfStock(OutOfStock {
                id: self.id,
                name: self.name.clone(),
            })),
        }
        Ok(events)
    }

    fn handle_missed(&self) -> Result<Vec<MedicationEvent>, DomainError> {
        self.ensure_created()?;
        Ok(vec![MedicationEvent::DoseMissed(DoseMissed {
            id: self.id,
            name: self.name.clone(),
        })])
    }

    fn handle_set_quantity(&self, cmd: &SetQuantity) -> Result<Vec<MedicationEvent>, DomainError> {
        self.ensure_created()?;

        let mut events = vec![MedicationEvent::QuantitySet(QuantitySet {
            id: self.id,
            name: self.name.clone(),
            quantity: cmd.quantity,
        })];
        match StockLevel::classify(cmd.quantity, self.refill_threshold) {
            StockLevel::Healthy => {}
            StockLevel::Low => events.push(self.running_low(cmd.quantity, StockTrigger::Adjusted)),
            StockLevel::Empty => events.push(MedicationEvent::Depleted(Depleted {
                id: self.id,
                name: self.name.clone(),
            })),
        }
        Ok(events)
    }

    fn dose_taken(&self, dose: u32, quantity_after: u32) -> MedicationEvent {
        MedicationEvent::DoseTaken(DoseTaken {
            id: self.id,
            name: self.name.clone(),
            dose_amount: dose,
            quantity_before: self.quantity,
            quantity_after,
        })
    }

    fn running_low(&self, quantity: u32, trigger: StockTrigger) -> MedicationEvent {
        MedicationEvent::RunningLow(RunningLow {
            id: self.id,
            name: self.name.clone(),
            quantity,
            doses_remaining: derive_doses_remaining(quantity, self.dose_amount()),
            trigger,
        })
    }
}
