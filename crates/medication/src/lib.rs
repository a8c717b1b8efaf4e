//! Medication domain module.
//!
//! Business rules for medication reminders and their inventory, implemented
//! as deterministic domain logic (no IO, no clocks, no notification delivery).

pub mod dosage;
pub mod intake;
pub mod notice;
pub mod record;
pub mod schedule;
pub mod stock;

pub use dosage::{derive_dose_amount, derive_doses_remaining};
pub use intake::{MedicationForm, NewMedication, StockSuggestion};
pub use notice::{Notice, Severity, low_stock_banner};
pub use record::{
    Depleted, DoseMissed, DoseTaken, InsufficientQuantity, InsufficientStockPolicy, MarkMissed,
    MarkTaken, MedicationAdded, MedicationCommand, MedicationDeleted, MedicationEvent,
    MedicationRecord, OutOfStock, QuantitySet, Register, ReminderStatus, RunningLow, SetQuantity,
    StockTrigger, TimeToTake,
};
pub use schedule::{Frequency, ReminderTime};
pub use stock::{LowStockRule, StockLevel};
