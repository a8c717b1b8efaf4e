//! Dose size derivation from free-text dosage descriptions.
//!
//! Parsing is deliberately shallow: the first run of decimal digits is the
//! dose, anything else ("take as needed", "half a tablet") counts as one unit.

/// Units consumed per "taken" action, parsed from `dosage`.
///
/// Returns the first run of ASCII digits as an integer, or `1` when there are
/// no digits, the number does not fit in a `u32`, or it parses as zero.
pub fn derive_dose_amount(dosage: &str) -> u32 {
    let Some(start) = dosage.find(|c: char| c.is_ascii_digit()) else {
        return 1;
    };
    let digits = &dosage[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    match digits[..end].parse::<u32>() {
        Ok(0) | Err(_) => 1,
        Ok(amount) => amount,
    }
}

/// Whole doses left in `quantity` units; `dose_amount` is clamped to at least 1.
pub fn derive_doses_remaining(quantity: u32, dose_amount: u32) -> u32 {
    quantity / dose_amount.max(1)
}
