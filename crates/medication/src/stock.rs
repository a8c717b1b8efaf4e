//! Stock-level rules.
//!
//! Three different "low stock" tests are in use and they disagree at boundary
//! values (e.g. a refill threshold that is not a multiple of the dose). Each
//! one is named here and callers pick the one they mean:
//!
//! - [`at_or_below_threshold`]: quantity-based, drives the alerts raised when
//!   stock changes and the per-record "refill needed" flag.
//! - [`low_in_doses`]: dose-based, drives the aggregate low-stock banner.
//! - [`insufficient_for_dose`]: not enough left for one full dose.

use serde::{Deserialize, Serialize};

use crate::dosage::derive_doses_remaining;

/// Quantity at or below the refill threshold (zero included).
pub fn at_or_below_threshold(quantity: u32, refill_threshold: u32) -> bool {
    quantity <= refill_threshold
}

/// Doses remaining at or below the threshold expressed in whole doses.
pub fn low_in_doses(quantity: u32, refill_threshold: u32, dose_amount: u32) -> bool {
    derive_doses_remaining(quantity, dose_amount)
        <= derive_doses_remaining(refill_threshold, dose_amount)
}

pub fn insufficient_for_dose(quantity: u32, dose_amount: u32) -> bool {
    quantity < dose_amount.max(1)
}

/// Which rule the low-stock banner uses.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LowStockRule {
    /// `doses_remaining <= floor(refill_threshold / dose)`.
    #[default]
    Doses,
    /// `quantity <= refill_threshold`.
    Quantity,
}

impl LowStockRule {
    pub fn is_low(self, quantity: u32, refill_threshold: u32, dose_amount: u32) -> bool {
        match self {
            LowStockRule::Doses => low_in_doses(quantity, refill_threshold, dose_amount),
            LowStockRule::Quantity => at_or_below_threshold(quantity, refill_threshold),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "doses" => Some(Self::Doses),
            "quantity" => Some(Self::Quantity),
            _ => None,
        }
    }
}

/// Level reached after a stock change, used to pick which alert to raise.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StockLevel {
    /// Above the refill threshold: no alert.
    Healthy,
    /// `0 < quantity <= refill_threshold`.
    Low,
    /// Nothing left.
    Empty,
}

impl StockLevel {
    pub fn classify(quantity: u32, refill_threshold: u32) -> Self {
        if quantity == 0 {
            StockLevel::Empty
        } else if at_or_below_threshold(quantity, refill_threshold) {
            StockLevel::Low
        } else {
            StockLevel::Healthy
        }
    }
}

/// Fill level for a progress bar, where three refill thresholds count as full.
pub fn stock_percent(quantity: u32, refill_threshold: u32) -> u8 {
    if refill_threshold == 0 {
        return if quantity > 0 { 100 } else { 0 };
    }
    let full = u64::from(refill_threshold) * 3;
    // Round half up in integer arithmetic.
    let percent = (u64::from(quantity) * 200 + full) / (full * 2);
    percent.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_boundaries() {
        assert_eq!(StockLevel::classify(0, 4), StockLevel::Empty);
        assert_eq!(StockLevel::classify(1, 4), StockLevel::Low);
        assert_eq!(StockLevel::classify(4, 4), StockLevel::Low);
        assert_eq!(StockLevel::classify(5, 4), StockLevel::Healthy);
        assert_eq!(StockLevel::classify(0, 0), StockLevel::Empty);
        assert_eq!(StockLevel::classify(1, 0), StockLevel::Healthy);
    }

    #[test]
    fn rules_disagree_when_threshold_is_not_a_dose_multiple() {
        // threshold 4, dose 3: 5 units is one dose, and floor(4 / 3) is one dose.
        assert!(low_in_doses(5, 4, 3));
        assert!(!at_or_below_threshold(5, 4));
        assert!(LowStockRule::Doses.is_low(5, 4, 3));
        assert!(!LowStockRule::Quantity.is_low(5, 4, 3));
    }

    #[test]
    fn insufficient_is_strictly_less_than_a_dose() {
        assert!(insufficient_for_dose(1, 2));
        assert!(!insufficient_for_dose(2, 2));
        assert!(insufficient_for_dose(0, 0));
    }

    #[test]
    fn percent_is_capped_and_rounded() {
        assert_eq!(stock_percent(30, 5), 100);
        assert_eq!(stock_percent(100, 5), 100);
        assert_eq!(stock_percent(5, 5), 33);
        assert_eq!(stock_percent(10, 5), 67);
        assert_eq!(stock_percent(0, 5), 0);
        assert_eq!(stock_percent(3, 0), 100);
        assert_eq!(stock_percent(0, 0), 0);
    }

    #[test]
    fn rule_parsing() {
        assert_eq!(LowStockRule::parse(" Doses "), Some(LowStockRule::Doses));
        assert_eq!(LowStockRule::parse("quantity"), Some(LowStockRule::Quantity));
        assert_eq!(LowStockRule::parse("units"), None);
    }
}
