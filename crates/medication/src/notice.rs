//! User-facing wording for medication events.

use serde::{Deserialize, Serialize};

use crate::record::{MedicationEvent, StockTrigger};

/// How loudly a notice should be shown.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// Title/body pair handed to the notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub body: String,
    pub severity: Severity,
}

impl Notice {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity: Severity::Info,
        }
    }

    pub fn warning(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity: Severity::Warning,
        }
    }
}

fn doses(n: u32) -> &'static str {
    if n == 1 { "dose" } else { "doses" }
}

impl MedicationEvent {
    /// Notice to show for this event, if any. Quantity edits on their own are
    /// silent; only the stock alerts they cause are announced.
    pub fn notice(&self) -> Option<Notice> {
        let notice = match self {
            MedicationEvent::Added(e) => Notice::info(
                "Medicine Reminder Added",
                format!(
                    "{} reminder has been set for {}",
                    e.medication.name, e.medication.time
                ),
            ),
            MedicationEvent::Deleted(_) => {
                Notice::info("Reminder deleted", "The reminder has been removed")
            }
            MedicationEvent::DoseTaken(e) => Notice::info(
                format!("{} Taken", e.name),
                "Great job! You've marked this medicine as taken.",
            ),
            MedicationEvent::DoseMissed(e) => Notice::warning(
                format!("{} Missed", e.name),
                "You've marked this medicine as missed. Don't forget next time!",
            ),
            MedicationEvent::QuantitySet(_) => return None,
            MedicationEvent::RunningLow(e) => match e.trigger {
                StockTrigger::DoseTaken => Notice::warning(
                    format!("{} - Running Low", e.name),
                    format!(
                        "After taking this dose, you have {} {} left. Please refill soon.",
                        e.doses_remaining,
                        doses(e.doses_remaining)
                    ),
                ),
                StockTrigger::Adjusted => Notice::warning(
                    format!("{} Running Low", e.name),
                    format!(
                        "You only have {} {} of {} left. Consider refilling soon.",
                        e.doses_remaining,
                        doses(e.doses_remaining),
                        e.name
                    ),
                ),
            },
            MedicationEvent::OutOfStock(e) => Notice::warning(
                format!("{} - Out of Stock!", e.name),
                "This was your last dose! You need to refill immediately.",
            ),
            MedicationEvent::Depleted(e) => Notice::warning(
                format!("{} Depleted", e.name),
                format!("You are out of {}. Please refill as soon as possible.", e.name),
            ),
            MedicationEvent::InsufficientQuantity(e) => Notice::warning(
                "Insufficient Quantity",
                format!("Not enough {} left for a complete dose.", e.name),
            ),
            MedicationEvent::TimeToTake(e) => Notice::info(
                format!("Time to take {}", e.name),
                format!(
                    "Your dosage is {}. You have {} {} remaining.",
                    e.dosage,
                    e.doses_remaining,
                    doses(e.doses_remaining)
                ),
            ),
        };
        Some(notice)
    }
}

/// Aggregate banner text for the low-stock set, or `None` when nothing is low.
pub fn low_stock_banner<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<Notice> {
    let names: Vec<&str> = names.into_iter().collect();
    if names.is_empty() {
        return None;
    }
    Some(Notice::warning(
        "Medicine Inventory Alert",
        format!("You're running low on: {}. Please refill soon.", names.join(", ")),
    ))
}
