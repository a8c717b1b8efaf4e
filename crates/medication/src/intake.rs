//! Add-form intake.
//!
//! The engine accepts a [`NewMedication`] as-is. Checking the required fields
//! is the form's job: [`MedicationForm::submit`] performs that gate and fills
//! in stock defaults derived from the dosage text.

use serde::{Deserialize, Serialize};

use medrem_core::{DomainError, DomainResult};

use crate::dosage::derive_dose_amount;
use crate::schedule::{Frequency, ReminderTime};

/// Input accepted by the engine's `add` operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMedication {
    pub name: String,
    pub time: ReminderTime,
    pub dosage: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub frequency: Frequency,
    pub quantity: u32,
    pub refill_threshold: u32,
}

/// Quantity and refill threshold proposed for a dosage.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StockSuggestion {
    pub quantity: u32,
    pub refill_threshold: u32,
}

impl StockSuggestion {
    pub const DEFAULT_QUANTITY: u32 = 30;
    pub const DEFAULT_REFILL_THRESHOLD: u32 = 5;

    const SUPPLY_DAYS: u32 = 15;
    const REFILL_DAYS: u32 = 5;

    /// A 15-day supply with a 5-day refill threshold when the dosage names a
    /// number; the plain form defaults otherwise.
    pub fn for_dosage(dosage: &str) -> Self {
        if !dosage.chars().any(|c| c.is_ascii_digit()) {
            return Self::default();
        }
        let dose = derive_dose_amount(dosage);
        Self {
            quantity: dose.saturating_mul(Self::SUPPLY_DAYS),
            refill_threshold: dose.saturating_mul(Self::REFILL_DAYS),
        }
    }
}

impl Default for StockSuggestion {
    fn default() -> Self {
        Self {
            quantity: Self::DEFAULT_QUANTITY,
            refill_threshold: Self::DEFAULT_REFILL_THRESHOLD,
        }
    }
}

/// Raw add-form fields as typed by the user.
///
/// `quantity` and `refill_threshold` are `None` when the user left the
/// suggested values alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MedicationForm {
    pub name: String,
    pub time: String,
    pub dosage: String,
    pub instructions: String,
    pub frequency: Option<String>,
    pub quantity: Option<u32>,
    pub refill_threshold: Option<u32>,
}

impl MedicationForm {
    /// Validate the required fields and build the engine input.
    pub fn submit(&self) -> DomainResult<NewMedication> {
        let name = required("name", &self.name)?;
        let time = required("time", &self.time)?.parse::<ReminderTime>()?;
        let dosage = required("dosage", &self.dosage)?;

        let frequency = match self.frequency.as_deref().map(str::trim) {
            None | Some("") => Frequency::default(),
            Some(raw) => Frequency::parse(raw)
                .ok_or_else(|| DomainError::validation(format!("unknown frequency: {raw}")))?,
        };

        let suggestion = StockSuggestion::for_dosage(dosage);

        Ok(NewMedication {
            name: name.to_string(),
            time,
            dosage: dosage.to_string(),
            instructions: self.instructions.trim().to_string(),
            frequency,
            quantity: self.quantity.unwrap_or(suggestion.quantity),
            refill_threshold: self.refill_threshold.unwrap_or(suggestion.refill_threshold),
        })
    }
}

fn required<'a>(field: &str, value: &'a str) -> DomainResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> MedicationForm {
        MedicationForm {
            name: "Aspirin".to_string(),
            time: "08:00".to_string(),
            dosage: "2 pills".to_string(),
            ..MedicationForm::default()
        }
    }

    #[test]
    fn suggestion_scales_with_dose() {
        assert_eq!(
            StockSuggestion::for_dosage("2 pills"),
            StockSuggestion { quantity: 30, refill_threshold: 10 }
        );
        assert_eq!(
            StockSuggestion::for_dosage("5ml"),
            StockSuggestion { quantity: 75, refill_threshold: 25 }
        );
    }

    #[test]
    fn suggestion_without_number_uses_form_defaults() {
        assert_eq!(StockSuggestion::for_dosage("one tablet"), StockSuggestion::default());
        assert_eq!(StockSuggestion::default().quantity, 30);
        assert_eq!(StockSuggestion::default().refill_threshold, 5);
    }

    #[test]
    fn submit_fills_suggested_stock() {
        let input = form().submit().unwrap();
        assert_eq!(input.name, "Aspirin");
        assert_eq!(input.time.to_string(), "08:00");
        assert_eq!(input.frequency, Frequency::Daily);
        assert_eq!(input.quantity, 30);
        assert_eq!(input.refill_threshold, 10);
    }

    #[test]
    fn explicit_stock_wins_over_suggestion() {
        let input = MedicationForm {
            quantity: Some(10),
            refill_threshold: Some(4),
            frequency: Some("as-needed".to_string()),
            ..form()
        }
        .submit()
        .unwrap();
        assert_eq!(input.quantity, 10);
        assert_eq!(input.refill_threshold, 4);
        assert_eq!(input.frequency, Frequency::AsNeeded);
    }

    #[test]
    fn required_fields_are_gated() {
        for broken in [
            MedicationForm { name: "  ".to_string(), ..form() },
            MedicationForm { time: String::new(), ..form() },
            MedicationForm { dosage: String::new(), ..form() },
        ] {
            let err = broken.submit().unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    #[test]
    fn malformed_time_and_frequency_are_rejected() {
        let bad_time = MedicationForm { time: "8 am".to_string(), ..form() };
        assert!(matches!(bad_time.submit(), Err(DomainError::Validation(_))));

        let bad_freq = MedicationForm { frequency: Some("hourly".to_string()), ..form() };
        assert!(matches!(bad_freq.submit(), Err(DomainError::Validation(_))));
    }
}
